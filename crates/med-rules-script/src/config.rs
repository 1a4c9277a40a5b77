//! Configuration for script-level extraction.

use med_rules::Conventions;

/// Markers of the generated SQL script layout.
///
/// # Example
///
/// ```rust
/// use med_rules_script::ScriptConfig;
///
/// let config = ScriptConfig::builder()
///     .with_source_table("DISPENSING")
///     .with_parallel(true)
///     .build();
/// assert_eq!(config.insert_marker, "insert into ");
/// assert_eq!(config.source_table, "DISPENSING");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Conventions applied to each fragment.
    pub conventions: Conventions,
    /// Text shared by all medication group headings.
    pub group_prefix: String,
    /// Heading suffixes and the group id they start, checked in order.
    pub group_markers: Vec<(i32, String)>,
    /// Text introducing an insert statement's destination table.
    pub insert_marker: String,
    /// A table every medication insert reads from.
    pub source_table: String,
    /// Column whose presence marks a code-list insert.
    pub code_column: String,
    /// Text opening a name condition.
    pub condition_start: String,
    /// Filter that follows a name condition.
    pub condition_end: String,
    /// Text introducing a quoted lab code list.
    pub lab_marker: String,
    /// Extract inserts in parallel (requires the `parallel` feature).
    pub parallel: bool,
}

impl ScriptConfig {
    /// Creates a new builder starting from the defaults.
    pub fn builder() -> ScriptConfigBuilder {
        ScriptConfigBuilder::default()
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            conventions: Conventions::default(),
            group_prefix: "People with at least one ordered medications ".to_string(),
            group_markers: vec![
                (1, "specific to Diabetes Mellitus".to_string()),
                (0, "non-specific to Diabetes Mellitus".to_string()),
            ],
            insert_marker: "insert into ".to_string(),
            source_table: "PRESCRIBING".to_string(),
            code_column: "RXNORM_CUI".to_string(),
            condition_start: "where (".to_string(),
            condition_end: "and e.ENC_TYPE in".to_string(),
            lab_marker: "where l.LAB_LOINC in".to_string(),
            parallel: false,
        }
    }
}

/// Builder for ScriptConfig.
#[derive(Debug, Clone, Default)]
pub struct ScriptConfigBuilder {
    config: ScriptConfig,
}

impl ScriptConfigBuilder {
    /// Sets the fragment conventions.
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.config.conventions = conventions;
        self
    }

    /// Sets the group heading prefix and suffix markers.
    pub fn with_group_markers(
        mut self,
        prefix: impl Into<String>,
        markers: Vec<(i32, String)>,
    ) -> Self {
        self.config.group_prefix = prefix.into();
        self.config.group_markers = markers;
        self
    }

    /// Sets the table medication inserts read from.
    pub fn with_source_table(mut self, table: impl Into<String>) -> Self {
        self.config.source_table = table.into();
        self
    }

    /// Sets the column marking code-list inserts.
    pub fn with_code_column(mut self, column: impl Into<String>) -> Self {
        self.config.code_column = column.into();
        self
    }

    /// Sets the text around name conditions.
    pub fn with_condition_bounds(
        mut self,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.config.condition_start = start.into();
        self.config.condition_end = end.into();
        self
    }

    /// Sets the lab code list marker.
    pub fn with_lab_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.lab_marker = marker.into();
        self
    }

    /// Enables or disables parallel extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Builds the ScriptConfig.
    pub fn build(self) -> ScriptConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_config_default() {
        let config = ScriptConfig::default();
        assert_eq!(config.group_markers.len(), 2);
        assert_eq!(config.group_markers[0].0, 1);
        assert_eq!(config.code_column, "RXNORM_CUI");
        assert_eq!(config.condition_start, "where (");
        assert!(!config.parallel);
    }

    #[test]
    fn test_script_config_builder() {
        let config = ScriptConfig::builder()
            .with_group_markers("Cohort: ", vec![(7, "insulin".to_string())])
            .with_code_column("NDC")
            .with_condition_bounds("where ((", "and x.Y in")
            .with_lab_marker("where lab in")
            .with_conventions(Conventions::builder().with_flag("c").build())
            .build();

        assert_eq!(config.group_prefix, "Cohort: ");
        assert_eq!(config.group_markers, vec![(7, "insulin".to_string())]);
        assert_eq!(config.code_column, "NDC");
        assert_eq!(config.condition_start, "where ((");
        assert_eq!(config.condition_end, "and x.Y in");
        assert_eq!(config.lab_marker, "where lab in");
        assert_eq!(config.conventions.flag, "c");
        assert_eq!(config.source_table, "PRESCRIBING");
    }
}
