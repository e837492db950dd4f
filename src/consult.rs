//! The consultation form definition shipped with the binary
//!
//! Section layout matters for the exported report: the examination block
//! sits between the second and third separator, so its lines are merged
//! pairwise into prose by the formatter.

use crate::clock;
use crate::config::TuiConfig;
use crate::form::{
    ContainerKind, ElementOptions, FieldDescriptor, FieldOption, FormError, FormPage,
    InputListParams, PageConfig,
};

/// Fields whose focus triggers body-surface-area recomputation
pub const BSA_FIELDS: [&str; 3] = ["growth", "mass", "bsaResult"];

/// Build the consultation page with all of its sections
pub fn build(config: &TuiConfig) -> Result<FormPage, FormError> {
    let container_kind = match config.container_kind.as_deref() {
        Some(raw) => ContainerKind::parse(raw).ok_or_else(|| {
            FormError::InvalidDescriptor(format!(
                "unsupported container kind {raw:?}, expected one of: form, div, section, article"
            ))
        })?,
        None => ContainerKind::Form,
    };
    let mut page = FormPage::new(PageConfig {
        form_class: "form-group".to_string(),
        container_kind,
    })?;

    // page heading sits before the form and never reaches the report
    page.add_header("Consultation", 1, None)?;

    page.create_element(ElementOptions::named("title").text("## Consultation record"));
    page.add_field(
        FieldDescriptor::text("patient")
            .label("Patient:")
            .validation_message("Patient name is required"),
    )?;
    page.add_field(FieldDescriptor::text("birth").label("Date of birth:"))?;
    page.add_field(
        FieldDescriptor::text("date")
            .label("Date:")
            .initial_value(&clock::current_date()),
    )?;
    page.add_field(
        FieldDescriptor::text("time")
            .label("Time:")
            .initial_value(&clock::current_time_rounded(config.round_time())),
    )?;
    page.add_field(
        FieldDescriptor::radio("primary_visit")
            .label("Primary visit:")
            .checked(true)
            .optional(),
    )?;

    page.add_separator();

    let complaints = page.add_div("complaints-section", None);
    page.add_header("Complaints", 3, Some(complaints))?;
    page.create_input_list(InputListParams::new("complaints").container(complaints));

    page.add_separator();

    // examination block: the report's merged section
    let exam = page.add_div("examination-section", None);
    page.create_element(
        ElementOptions::named("exam-title")
            .text("# Objective status")
            .parent(exam),
    );
    page.add_field(
        FieldDescriptor::text("general_state")
            .label("General state:")
            .initial_value("satisfactory")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::text("pulse")
            .label("Pulse:")
            .sub_text("bpm")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::text("pressure")
            .label("Blood pressure:")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::text("growth")
            .label("Height:")
            .sub_text("cm")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::text("mass")
            .label("Weight:")
            .sub_text("kg")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::text("bsaResult")
            .label("Body surface area:")
            .sub_text("m²")
            .optional()
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::select("blood", blood_options())
            .label("Blood group:")
            .container(exam),
    )?;
    page.add_field(
        FieldDescriptor::select("rh_factor", rh_options())
            .label("Rh factor:")
            .initial_index(0)
            .container(exam),
    )?;

    page.add_separator();

    page.add_field(
        FieldDescriptor::text_area("conclusion")
            .label("Conclusion:")
            .class("wide"),
    )?;
    page.add_field(FieldDescriptor::checkbox("followup").label("Follow-up required:").optional())?;
    page.add_spacer();
    page.add_field(
        FieldDescriptor::datalist("doctor", specialist_options()).label("Examined by:"),
    )?;
    // on-screen hint only: no proc class, so it never reaches the report
    page.create_element(
        ElementOptions::named("hint")
            .text("Entries are saved automatically when the report is exported")
            .class("form-hint")
            .auto_proc(false),
    );

    Ok(page)
}

fn blood_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("O", "O (I)"),
        FieldOption::new("A", "A (II)"),
        FieldOption::new("B", "B (III)"),
        FieldOption::new("AB", "AB (IV)"),
    ]
}

fn rh_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("+", "+ (positive)"),
        FieldOption::new("-", "- (negative)"),
    ]
}

fn specialist_options() -> Vec<FieldOption> {
    ["Therapist", "Surgeon", "Pediatrician", "Cardiologist"]
        .into_iter()
        .map(FieldOption::from)
        .collect()
}
