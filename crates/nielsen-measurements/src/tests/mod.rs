mod control;
pub(crate) mod support;
