pub mod errors;
pub mod http;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod utils;

pub use errors::VerbDeckError;
pub use models::{
    ConjugationRecord,
    ExampleFields,
    ExampleRecord,
    FetchedPage,
    MergedRecord,
    RecordContent,
    FORM_SEPARATOR,
};
