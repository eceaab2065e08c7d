pub(crate) mod form;
pub(crate) mod hints;
pub(crate) mod lazy;
pub(crate) mod menu;
pub(crate) mod nav;
pub(crate) mod notify;
pub(crate) mod perf;
