//! Render planned fakes into Go source

use tracing::{debug, info, warn};

use crate::canonical::Canonicalize;
use crate::error::GenerationError;
use crate::planning::{self, Plan};
use crate::schema::Schema;

mod emitter;
mod header;
mod signature;

use emitter::Emitter;
use header::Templates;

/// Render a plan into raw, uncanonicalized source text. Interfaces and
/// their methods appear in plan order.
pub fn render(plan: &Plan) -> Result<String, GenerationError> {
    let templates = Templates::new()?;
    let mut output = Emitter::new();

    output.append_str(&templates.header(plan)?);

    for interface in &plan.interfaces {
        debug!("Emitting {}", interface.fake);

        for method in &interface.methods {
            output.emit_invocation(method);
        }

        output.emit_testing(interface);
        output.append_str(&templates.usage(plan, interface)?);
        output.emit_fake(interface);
        output.emit_constructors(interface);
        output.emit_reset(interface);

        for method in &interface.methods {
            output.emit_wrapper(interface, method);
            output.emit_counting(interface, method);
            output.emit_matching(interface, method);
        }
    }

    Ok(output.finish())
}

/// Plan, render, and canonicalize. A schema or rendering problem aborts
/// the whole run with no output. If only canonicalization fails the raw
/// text is returned inside the error.
pub fn generate(
    schema: &Schema,
    canonicalizer: &dyn Canonicalize,
) -> Result<String, GenerationError> {
    let plan = planning::plan(schema)?;
    let raw = render(&plan)?;

    info!(
        "Generated {} fake{} ({} bytes)",
        plan.interfaces
            .len(),
        if plan
            .interfaces
            .len()
            == 1
        {
            ""
        } else {
            "s"
        },
        raw.len()
    );

    match canonicalizer.canonicalize(&raw) {
        Ok(text) => Ok(text),
        Err(problem) => {
            warn!(?problem, "Canonicalization failed");
            Err(GenerationError::Canonicalization { problem, raw })
        }
    }
}
