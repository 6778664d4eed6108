use sdp_core::params::ParamValue;

use crate::program::{Height, Position, Program, Resource, Stage, Step};

/// File name the artifact for the given experiment is persisted under.
pub fn artifact_file_name(experiment_id: &str) -> String {
    format!("dilution_exp_{experiment_id}.py")
}

/// Renders a program into one self-contained artifact.
///
/// The output carries a metadata header, the full literal parameter set, and
/// a procedure body that only invokes the closed hardware-control vocabulary
/// (`load`, `select_tool`, `pick_up`, `aspirate`, `dispense`,
/// `clear_residual`, `touch_decontaminate`, `release_tool`) plus the
/// `uniform(min, max)` sampling instruction resolved by the executor.
/// Rendering is pure; the only data-dependent text passes through literal
/// formatting with explicit string escaping.
pub fn render(program: &Program) -> String {
    let mut out = String::new();
    let id = &program.meta.experiment_id;
    out.push_str(&format!("# Serial dilution protocol for experiment {id}.\n"));
    out.push_str("# Self-contained: the embedded parameter set is complete and nothing is\n");
    out.push_str("# looked up at run time. Heights passed as uniform(min, max) are sampled\n");
    out.push_str("# by the executor.\n\n");

    out.push_str("metadata = {\n");
    out.push_str(&format!(
        "    \"protocol_name\": {},\n",
        text_literal(&program.meta.name)
    ));
    out.push_str(&format!(
        "    \"description\": {},\n",
        text_literal(&program.meta.description)
    ));
    out.push_str("}\n\n");

    out.push_str("PARAMS = {\n");
    for (name, value) in program.params.iter() {
        out.push_str(&format!(
            "    {}: {},\n",
            text_literal(name),
            value_literal(value)
        ));
    }
    out.push_str("}\n\n");

    out.push_str("def run(ctx):\n");
    for resource in [Resource::Plate, Resource::Reservoir, Resource::TipRack] {
        out.push_str(&format!(
            "    {} = load({})\n",
            resource.handle(),
            text_literal(resource.identifier())
        ));
    }
    out.push_str(&format!("    tool = select_tool({})\n", Resource::TipRack.handle()));
    for stage in &program.stages {
        render_stage(&mut out, stage);
    }
    out
}

fn render_stage(out: &mut String, stage: &Stage) {
    out.push_str(&format!(
        "\n    pick_up(tool, {})\n",
        text_literal(&stage.tip_well)
    ));
    for step in &stage.steps {
        render_step(out, step);
    }
    out.push_str("    release_tool(tool)\n");
}

fn render_step(out: &mut String, step: &Step) {
    match step {
        Step::Aliquot(aliquot) => {
            out.push_str(&format!(
                "    aspirate(tool, {}, {}, {})\n",
                float_literal(aliquot.volume),
                position_literal(&aliquot.source),
                float_literal(aliquot.aspirate_rate)
            ));
            out.push_str(&format!(
                "    dispense(tool, {}, {}, {})\n",
                float_literal(aliquot.volume),
                position_literal(&aliquot.dest),
                float_literal(aliquot.dispense_rate)
            ));
            out.push_str(&format!(
                "    clear_residual(tool, {})\n",
                top_literal(&aliquot.dest)
            ));
        }
        Step::Dilution(dilution) => {
            out.push_str(&format!(
                "    aspirate(tool, {}, {}, {})\n",
                float_literal(dilution.volume),
                position_literal(&dilution.source),
                float_literal(dilution.aspirate_rate)
            ));
            out.push_str(&format!(
                "    dispense(tool, {}, {}, {})\n",
                float_literal(dilution.volume),
                position_literal(&dilution.dest),
                float_literal(dilution.dispense_rate)
            ));
        }
        Step::Mix(mix) => {
            out.push_str(&format!("    for _ in range({}):\n", mix.repetitions));
            out.push_str(&format!(
                "        aspirate(tool, {}, ({}, {}, {}), {})\n",
                float_literal(mix.volume),
                Resource::Plate.handle(),
                text_literal(&mix.well),
                height_literal(&mix.aspirate_height),
                float_literal(mix.aspirate_rate)
            ));
            out.push_str(&format!(
                "        dispense(tool, {}, ({}, {}, {}), {})\n",
                float_literal(mix.volume),
                Resource::Plate.handle(),
                text_literal(&mix.well),
                height_literal(&mix.dispense_height),
                float_literal(mix.dispense_rate)
            ));
            out.push_str(&format!(
                "    touch_decontaminate(tool, ({}, {}, \"top\"), {}, {}, {})\n",
                Resource::Plate.handle(),
                text_literal(&mix.well),
                float_literal(mix.touch.radius),
                float_literal(mix.touch.v_offset),
                float_literal(mix.touch.speed)
            ));
        }
        Step::Disposal(disposal) => {
            out.push_str(&format!(
                "    aspirate(tool, {}, {}, {})\n",
                float_literal(disposal.aspirate_volume),
                position_literal(&disposal.source),
                float_literal(disposal.aspirate_rate)
            ));
            out.push_str(&format!(
                "    dispense(tool, {}, {}, {})\n",
                float_literal(disposal.dispense_volume),
                position_literal(&disposal.dest),
                float_literal(disposal.dispense_rate)
            ));
        }
    }
}

fn position_literal(position: &Position) -> String {
    format!(
        "({}, {}, {})",
        position.resource.handle(),
        text_literal(&position.well),
        height_literal(&position.height)
    )
}

fn top_literal(position: &Position) -> String {
    format!(
        "({}, {}, \"top\")",
        position.resource.handle(),
        text_literal(&position.well)
    )
}

fn height_literal(height: &Height) -> String {
    match height {
        Height::Bottom { mm } => float_literal(*mm),
        Height::Top => "\"top\"".to_string(),
        Height::Sampled { min, max } => {
            format!("uniform({}, {})", float_literal(*min), float_literal(*max))
        }
    }
}

fn value_literal(value: &ParamValue) -> String {
    match value {
        ParamValue::Integer(v) => v.to_string(),
        ParamValue::Real(v) => float_literal(*v),
        ParamValue::Text(v) => text_literal(v),
    }
}

fn float_literal(value: f64) -> String {
    // {:?} keeps a trailing ".0" on integral floats, so the artifact reads as
    // float literals throughout.
    format!("{value:?}")
}

fn text_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped.push('"');
    escaped
}
