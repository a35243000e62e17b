//! VAM Session
//!
//! This example drives a tool session the way a host viewport would:
//! activating the tool, feeding key presses and pointer samples, and
//! dumping a diagnostic snapshot at the end.
//!
//! Key concepts:
//! - Key presses resolve to commands through the keymap
//! - Transitions rejected by the current state are skipped, not fatal
//! - Mode flags persist across transitions
//! - Pointer input reaches only the current state's handler
//!
//! Run with: cargo run --example vam_session

use vam::tool::{InputHandler, PointerSample, VamContext, VamSession, VamState};

struct MoveHandler;

impl InputHandler for MoveHandler {
    fn pointer_moved(&mut self, context: &mut VamContext, sample: PointerSample) {
        context.record_initial_value("translateX", sample.x);
        println!(
            "  drag to ({}, {}) as {} on axis {} in {} space",
            sample.x, sample.y, context.flags.transform, context.flags.axis, context.flags.base
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("=== VAM Session Example ===\n");

    let mut session = VamSession::new()?;
    session.set_handler(VamState::Moving, MoveHandler);
    session.activate()?;
    println!("Session {} active in state '{}'", session.id(), session.current_state());

    for key in ["g", "x", "Tab", "g", "r"] {
        let dispatch = session.press_key(key)?;
        println!("key {key:<6} -> {dispatch:?}");
    }

    session.pointer_moved(PointerSample { x: 12.0, y: -4.5 });

    session.press_key("Escape")?;
    println!("\nBack in '{}' with flags {:?}", session.current_state(), session.flags());

    session.deactivate()?;
    println!("\nSnapshot:\n{}", session.snapshot().to_json()?);

    println!("\n=== Example Complete ===");
    Ok(())
}
