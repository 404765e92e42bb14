//=========================================================================
// Global Services
//=========================================================================
//
// Process-wide service state, passed explicitly instead of reached
// through singletons.
//
// Architecture:
//   ServiceContext: PauseCoordinator + AudioRouter + TrackSelector
//                   + PersistenceStore + shared PlayerProgress
//   ServiceRequest: commands hosts and UI send into the context
//
//=========================================================================

//=== Module Declarations =================================================

mod service_context;
mod service_request;

//=== Public API ==========================================================

pub use service_context::ServiceContext;
pub use service_request::ServiceRequest;
