//! Core module - entities, the record store, persistence, and the audit trail

pub mod audit;
pub mod codec;
pub mod pipe;
pub mod station;
pub mod store;

pub use audit::AuditLog;
pub use codec::{decode, encode, load_from_file, save_to_file, CodecError};
pub use pipe::Pipe;
pub use station::CompressorStation;
pub use store::{
    Cmp, PipeFilter, PipeUpdate, RecordKind, RecordStore, Selection, StationFilter, StationUpdate,
    StoreError, WorkshopChange,
};
