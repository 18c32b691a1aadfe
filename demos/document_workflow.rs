//! Document Approval Workflow
//!
//! A four-stage approval flow (Draft -> Review -> Approved -> Published)
//! driven through the engine, with a rejection loop back to Draft.
//!
//! Run with: RUST_LOG=waypoint=debug cargo run --example document_workflow

use tracing::info;
use tracing_subscriber::EnvFilter;
use waypoint::builder::{ActionBuilder, BuildError, DefinitionBuilder};
use waypoint::core::{State, WorkflowDefinition};
use waypoint::WorkflowEngine;

fn document_approval() -> Result<WorkflowDefinition, BuildError> {
    DefinitionBuilder::new()
        .id("document-approval")
        .state(State::new("draft", "Draft").initial())
        .state(State::new("review", "Review"))
        .state(State::new("approved", "Approved"))
        .state(State::new("published", "Published").terminal())
        .transition(
            ActionBuilder::new("submit")
                .named("Submit for review")
                .from("draft")
                .to("review"),
        )?
        .transition(
            ActionBuilder::new("reject")
                .named("Send back")
                .from("review")
                .from("approved")
                .to("draft"),
        )?
        .transition(ActionBuilder::new("approve").from("review").to("approved"))?
        .transition(ActionBuilder::new("publish").from("approved").to("published"))?
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let engine = WorkflowEngine::new();
    let definition = engine.create_definition(document_approval()?)?;
    let document = engine.start_instance(&definition.id)?;
    info!(instance = %document.id, state = %document.current_state, "document opened");

    for action_id in ["submit", "reject", "submit", "approve", "publish"] {
        let document = engine.execute_action(&document.id, action_id)?;
        let next: Vec<String> = engine
            .available_actions(&document.id)?
            .into_iter()
            .map(|action| action.id)
            .collect();
        info!(action = action_id, state = %document.current_state, ?next, "transition applied");
    }

    // nothing leaves a final state
    if let Err(error) = engine.execute_action(&document.id, "reject") {
        info!(%error, kind = ?error.kind(), "rejected after publishing");
    }

    let document = engine.get_instance(&document.id)?;
    info!(
        path = ?document.history.path(),
        duration = ?document.history.duration(),
        "document history"
    );

    println!("{}", engine.checkpoint().to_json()?);
    Ok(())
}
