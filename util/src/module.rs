//! Control module interface
//!
//! The exec drives every control module the same way: `init` once when the
//! session starts, then `proc` for each telecommand.

use crate::session::Session;

/// A control module's state.
pub trait State {
    /// Data needed to bring the module up.
    type InitData;
    type InitError;

    /// Data handed to each processing step, usually a command.
    type InputData;
    /// The step's result, e.g. a response to the command.
    type OutputData;
    /// Flags raised while processing, reset on every step.
    type StatusReport;
    type ProcError;

    /// Bring the module up, e.g. prepare the equipment and archive the
    /// parameters in use under the session.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Run one processing step.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
