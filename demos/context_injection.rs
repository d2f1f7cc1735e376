//! Context Injection
//!
//! This example demonstrates defining behavior before dependencies exist and
//! building several machines once they do.
//!
//! Key concepts:
//! - `MachineBuilder` holds handlers and the initial state only
//! - Each `build(context)` gets its own dependencies
//! - Machines from one builder share handlers, never contexts
//! - `replace_context` swaps dependencies, e.g. after a reconnect
//!
//! Run with: cargo run --example context_injection

use std::collections::HashMap;
use switchyard::{event_enum, state_enum, MachineBuilder, Transition};

state_enum! {
    enum ServiceState {
        Uninitialized,
        Ready,
        Processing,
    }
}

event_enum! {
    enum ServiceEvent {
        Initialize,
        ProcessRequest { request_id: String },
        Complete,
    }
    kind: ServiceEventKind
}

#[derive(Debug)]
struct Database {
    url: String,
    connected: bool,
}

impl Database {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            connected: false,
        }
    }

    fn query(&self, request_id: &str) -> String {
        format!("{request_id}@{}", self.url)
    }
}

#[derive(Debug)]
struct ServiceContext {
    db: Database,
    cache: HashMap<String, String>,
    request_count: u32,
}

impl ServiceContext {
    fn new(url: &str) -> Self {
        Self {
            db: Database::new(url),
            cache: HashMap::new(),
            request_count: 0,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Context Injection ===\n");

    println!("1. Defining handlers (no dependencies yet)");
    let mut builder: MachineBuilder<ServiceState, ServiceEvent, ServiceContext> =
        MachineBuilder::new(ServiceState::Uninitialized);

    builder
        .on(ServiceState::Uninitialized, ServiceEventKind::Initialize, |fsm, _| {
            fsm.context_mut().db.connected = true;
            println!("   connected to {}", fsm.context().db.url);
            Ok(Transition::To(ServiceState::Ready))
        })?
        .on(ServiceState::Ready, ServiceEventKind::ProcessRequest, |fsm, event| {
            let ServiceEvent::ProcessRequest { request_id } = event else {
                return Ok(Transition::Stay);
            };
            let context = fsm.context_mut();
            context.request_count += 1;
            if context.cache.contains_key(&request_id) {
                println!("   cache hit: {request_id}");
            } else {
                let row = context.db.query(&request_id);
                context.cache.insert(request_id, row);
            }
            Ok(Transition::To(ServiceState::Processing))
        })?
        .on(ServiceState::Processing, ServiceEventKind::Complete, |_, _| {
            Ok(Transition::To(ServiceState::Ready))
        })?;

    println!("\n2. Building the first machine");
    let mut primary = builder.build(ServiceContext::new("postgres://localhost/app"));
    primary.dispatch_sync(ServiceEvent::Initialize)?;
    println!("   connected: {}", primary.context().db.connected);

    for id in ["req_001", "req_002", "req_001"] {
        primary.dispatch_sync(ServiceEvent::ProcessRequest {
            request_id: id.to_string(),
        })?;
        primary.dispatch_sync(ServiceEvent::Complete)?;
    }
    println!("   requests handled: {}", primary.context().request_count);

    println!("\n3. Building a second machine with other dependencies");
    let mut secondary = builder.build(ServiceContext::new("postgres://localhost/app2"));
    secondary.dispatch_sync(ServiceEvent::Initialize)?;
    println!(
        "   primary cache: {}, secondary cache: {}",
        primary.context().cache.len(),
        secondary.context().cache.len()
    );

    println!("\n4. Swapping the primary's dependencies");
    let old = primary.replace_context(ServiceContext::new("postgres://replica/app"));
    println!("   released {} (state kept: {:?})", old.db.url, primary.state());

    println!("\n=== Example Complete ===");
    Ok(())
}
