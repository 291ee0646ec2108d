mod common;

mod test_effects;
