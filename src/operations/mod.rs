pub mod preview_op;
pub mod probe_op;
pub mod snap_op;
