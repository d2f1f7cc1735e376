//! Mixed Sync and Async Handlers
//!
//! This example demonstrates one machine whose handlers are partly plain
//! functions and partly futures.
//!
//! Key concepts:
//! - Immediate handlers for simple transitions
//! - Suspending handlers for I/O-shaped work
//! - One `dispatch().await` call site for both
//! - `dispatch_sync()` refusing a suspending handler instead of blocking
//!
//! Run with: cargo run --example mixed_handlers

use std::time::Duration;
use switchyard::{event_enum, state_enum, FutureExt, MachineBuilder, Transition};

state_enum! {
    enum ProcessState {
        Idle,
        Loading,
        Processing,
        Done,
    }
}

event_enum! {
    enum ProcessEvent {
        Start { filename: String },
        DataLoaded { size: usize },
        ProcessComplete { result: String },
        Reset,
    }
    kind: ProcessEventKind
}

#[derive(Debug, Default)]
struct ProcessContext {
    filename: String,
    data_size: usize,
    result: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Mixed Sync/Async Handlers ===\n");

    let mut builder: MachineBuilder<ProcessState, ProcessEvent, ProcessContext> =
        MachineBuilder::new(ProcessState::Idle);

    builder
        .on(ProcessState::Idle, ProcessEventKind::Start, |fsm, event| {
            if let ProcessEvent::Start { filename } = event {
                println!("  Starting to load: {filename}");
                fsm.context_mut().filename = filename;
            }
            Ok(Transition::To(ProcessState::Loading))
        })?
        .on_async(ProcessState::Loading, ProcessEventKind::DataLoaded, |fsm, event| {
            async move {
                if let ProcessEvent::DataLoaded { size } = event {
                    println!("  Loading {size} bytes...");
                    fsm.context_mut().data_size = size;
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
                println!("  Data loaded, starting processing");
                Ok(Transition::To(ProcessState::Processing))
            }
            .boxed()
        })?
        .on_async(
            ProcessState::Processing,
            ProcessEventKind::ProcessComplete,
            |fsm, event| {
                async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    if let ProcessEvent::ProcessComplete { result } = event {
                        println!("  Processing complete: {result}");
                        fsm.context_mut().result = result;
                    }
                    Ok(Transition::To(ProcessState::Done))
                }
                .boxed()
            },
        )?
        .on(ProcessState::Done, ProcessEventKind::Reset, |fsm, _| {
            fsm.replace_context(ProcessContext::default());
            println!("  System reset");
            Ok(Transition::To(ProcessState::Idle))
        })?;

    let mut machine = builder.build(ProcessContext::default());

    machine
        .dispatch(ProcessEvent::Start {
            filename: "data.csv".into(),
        })
        .await?;

    match machine.dispatch_sync(ProcessEvent::DataLoaded { size: 1024 }) {
        Err(err) => println!("  dispatch_sync refused: {err}"),
        Ok(state) => println!("  unexpected: reached {state:?}"),
    }

    machine
        .dispatch(ProcessEvent::DataLoaded { size: 1024 })
        .await?;
    machine
        .dispatch(ProcessEvent::ProcessComplete {
            result: "Success: 42 records processed".into(),
        })
        .await?;
    println!("\nContext before reset: {:?}", machine.context());

    machine.dispatch(ProcessEvent::Reset).await?;
    println!("Final state: {:?}", machine.state());

    println!("\n=== Example Complete ===");
    Ok(())
}
