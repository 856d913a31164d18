mod action_record;
mod action_stream;

pub use action_record::*;
pub use action_stream::create_action_stream;
