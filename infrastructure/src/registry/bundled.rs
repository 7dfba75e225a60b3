//! Registry and schemas compiled into the binary

pub(super) const REGISTRY: &str = include_str!("../../registry/tool_registry.json");

pub(super) const SCHEMAS: &[(&str, &str)] = &[
    (
        "socratic_elenchus.request.json",
        include_str!("../../registry/schemas/socratic_elenchus.request.json"),
    ),
    (
        "socratic_elenchus.response.json",
        include_str!("../../registry/schemas/socratic_elenchus.response.json"),
    ),
    (
        "formative_check.request.json",
        include_str!("../../registry/schemas/formative_check.request.json"),
    ),
    (
        "formative_check.response.json",
        include_str!("../../registry/schemas/formative_check.response.json"),
    ),
    (
        "diagnostic_probe.request.json",
        include_str!("../../registry/schemas/diagnostic_probe.request.json"),
    ),
    (
        "diagnostic_probe.response.json",
        include_str!("../../registry/schemas/diagnostic_probe.response.json"),
    ),
    (
        "revision_scheduler.request.json",
        include_str!("../../registry/schemas/revision_scheduler.request.json"),
    ),
    (
        "revision_scheduler.response.json",
        include_str!("../../registry/schemas/revision_scheduler.response.json"),
    ),
    (
        "worked_example.request.json",
        include_str!("../../registry/schemas/worked_example.request.json"),
    ),
    (
        "worked_example.response.json",
        include_str!("../../registry/schemas/worked_example.response.json"),
    ),
    (
        "concept_mapper.request.json",
        include_str!("../../registry/schemas/concept_mapper.request.json"),
    ),
    (
        "concept_mapper.response.json",
        include_str!("../../registry/schemas/concept_mapper.response.json"),
    ),
];

pub(super) fn schema(name: &str) -> Option<&'static str> {
    SCHEMAS
        .iter()
        .find(|(file, _)| *file == name)
        .map(|(_, text)| *text)
}
