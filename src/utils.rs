mod increment_transfer_id;

pub use increment_transfer_id::increment_transfer_id;
