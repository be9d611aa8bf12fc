mod activity;

pub use activity::{ActivityEntry, NewActivity};
