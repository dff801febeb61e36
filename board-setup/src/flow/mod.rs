//! Setup and options flows.
//!
//! Each flow is a small state machine driven by its host: show a form, take
//! a submission, validate it against the rail service, and either finish
//! (creating or updating a configuration entry) or show the form again with
//! an error tag. Failures never escape a step as errors; only misuse of a
//! finished flow does.

mod error;
mod form;
mod options;
mod setup;
mod validate;


pub use error::{ErrorTag, FlowError, ValidationError};
pub use form::{FieldKey, Form, FormField, STATION_NAME, StepId, TOKEN_HINT, init_form, user_form};
pub use options::{OptionsFlow, OptionsInput, OptionsState, OptionsStep};
pub use setup::{SetupFlow, SetupState, SetupStep, UserInput};
pub use validate::{
    SENTINEL_DESTINATION, SENTINEL_STATION, StationLookup, ValidationInfo, entry_title,
    lookup_station_name, validate,
};
