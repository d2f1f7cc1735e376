//! Light Switch
//!
//! This example demonstrates the smallest useful machine: two states, one
//! event, and a counter in the context.
//!
//! Key concepts:
//! - Declaring states and events with macros
//! - Registering handlers directly on a machine
//! - Synchronous dispatch
//!
//! Run with: cargo run --example light_switch

use switchyard::{event_enum, state_enum, Machine, Transition};

state_enum! {
    enum LightState {
        Off,
        On,
    }
}

event_enum! {
    enum LightEvent {
        Toggle,
    }
    kind: LightEventKind
}

#[derive(Debug, Default)]
struct LightContext {
    toggles: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Light Switch ===\n");

    let mut light: Machine<LightState, LightEvent, LightContext> =
        Machine::new(LightState::Off, LightContext::default());

    light
        .on(LightState::Off, LightEventKind::Toggle, |fsm, _| {
            fsm.context_mut().toggles += 1;
            println!("  switched ON");
            Ok(Transition::To(LightState::On))
        })?
        .on(LightState::On, LightEventKind::Toggle, |fsm, _| {
            fsm.context_mut().toggles += 1;
            println!("  switched OFF");
            Ok(Transition::To(LightState::Off))
        })?;

    println!("Initial state: {:?}\n", light.state());

    for _ in 0..3 {
        light.dispatch_sync(LightEvent::Toggle)?;
    }

    println!("\nFinal state: {:?}", light.state());
    println!("Total toggles: {}", light.context().toggles);

    println!("\n=== Example Complete ===");
    Ok(())
}
