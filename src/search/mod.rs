pub mod context;
pub mod eval;
pub mod ordering;
pub mod pesto;
pub mod picker;
pub mod search;
pub mod see;
pub mod time_manager;
pub mod tt;
pub mod threadpool;
