pub mod application_workflow;
pub mod ledger_engine;
pub mod reporting;
pub mod validation;

pub use application_workflow::{
    ApplicationStateMachine, ApplicationWorkflow, SubmitFixedDeposit, SubmitRecurringDeposit,
};
pub use ledger_engine::{
    LedgerEngine, LedgerOutcome, PaymentInstruction, PaymentOutcome, TransferOutcome,
};
pub use reporting::ReportingService;
pub use validation::ValidationRules;
