//! Weighted field specification tables.
//!
//! A table is an ordered mapping of field name to either a single
//! [`FieldSpec`] or a named group of them. Groups nest exactly one level:
//! `meta.tier` is expressible, `meta.owner.email` is not.
//!
//! Tables are plain values. Each caller owns the table it scores against, so
//! data models, data products and any custom entity kind can coexist.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogHealthError, Result};
use crate::path::FieldPath;

/// Whether a field is marked required in the catalog's documentation.
///
/// This is informational only. Scoring looks at `weight` alone; a required
/// field does not count more than an optional one of the same weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Requirement {
    /// Documented as required.
    Required,
    /// Documented as optional.
    #[default]
    Optional,
}

impl From<bool> for Requirement {
    fn from(value: bool) -> Self {
        if value {
            Self::Required
        } else {
            Self::Optional
        }
    }
}

impl From<Requirement> for bool {
    fn from(value: Requirement) -> Self {
        matches!(value, Requirement::Required)
    }
}

/// Weight and requirement of one expected field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    /// Documentation-only requirement flag.
    #[serde(default)]
    pub required: Requirement,
    /// Contribution to the total weight; must be finite and positive.
    pub weight: f64,
}

impl FieldSpec {
    /// A field documented as required.
    pub fn required(weight: f64) -> Self {
        Self {
            required: Requirement::Required,
            weight,
        }
    }

    /// A field documented as optional.
    pub fn optional(weight: f64) -> Self {
        Self {
            required: Requirement::Optional,
            weight,
        }
    }

    /// Whether the field is documented as required.
    pub fn is_required(&self) -> bool {
        self.required == Requirement::Required
    }
}

/// A top-level table entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldSpecEntry {
    /// A field read directly from the entity.
    Field(FieldSpec),
    /// A group of fields read from `entity[group][field]`.
    Group(IndexMap<String, FieldSpec>),
}

/// Ordered, validated field specification table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    try_from = "IndexMap<String, FieldSpecEntry>",
    into = "IndexMap<String, FieldSpecEntry>"
)]
pub struct FieldSpecTable {
    entries: IndexMap<String, FieldSpecEntry>,
}

impl FieldSpecTable {
    /// Start building a table.
    pub fn builder() -> FieldSpecTableBuilder {
        FieldSpecTableBuilder::default()
    }

    /// Parse and validate a table from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: IndexMap<String, FieldSpecEntry> = serde_json::from_str(json)?;
        Self::try_from(entries)
    }

    /// Validate a table already parsed into a JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let entries: IndexMap<String, FieldSpecEntry> = serde_json::from_value(value)?;
        Self::try_from(entries)
    }

    /// Top-level entries in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &FieldSpecEntry)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry))
    }

    /// Every field flattened to its path, in declaration order.
    pub fn fields(&self) -> Vec<(FieldPath, &FieldSpec)> {
        let mut fields = Vec::new();
        for (name, entry) in &self.entries {
            match entry {
                FieldSpecEntry::Field(spec) => fields.push((FieldPath::new([name.as_str()]), spec)),
                FieldSpecEntry::Group(group) => {
                    let parent = FieldPath::new([name.as_str()]);
                    for (field, spec) in group {
                        fields.push((parent.child(field.as_str()), spec));
                    }
                }
            }
        }
        fields
    }

    /// Number of leaf fields.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .map(|entry| match entry {
                FieldSpecEntry::Field(_) => 1,
                FieldSpecEntry::Group(group) => group.len(),
            })
            .sum()
    }

    /// Whether the table has no fields.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of every field weight.
    pub fn total_weight(&self) -> f64 {
        self.fields().iter().map(|(_, spec)| spec.weight).sum()
    }

    /// Check every entry: names non-empty and dot-free, weights finite and
    /// positive, groups non-empty.
    pub fn validate(&self) -> Result<()> {
        for (name, entry) in &self.entries {
            validate_name(name, name)?;
            match entry {
                FieldSpecEntry::Field(spec) => validate_weight(name, spec)?,
                FieldSpecEntry::Group(group) => {
                    if group.is_empty() {
                        return Err(CatalogHealthError::invalid_spec(
                            name.as_str(),
                            "group has no fields",
                        ));
                    }
                    for (field, spec) in group {
                        let path = format!("{name}.{field}");
                        validate_name(field, &path)?;
                        validate_weight(&path, spec)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Expected fields of a data model specification.
    pub fn data_model() -> Self {
        let mut entries = IndexMap::new();
        let field = |spec| FieldSpecEntry::Field(spec);
        entries.insert("name".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("shortName".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("version".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("description".to_string(), field(FieldSpec::required(1.0)));
        entries.insert(
            "extendedDescription".to_string(),
            field(FieldSpec::optional(0.5)),
        );
        entries.insert("owner".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("specMaintainer".to_string(), field(FieldSpec::required(1.0)));
        entries.insert(
            "maintainerEmail".to_string(),
            field(FieldSpec::required(1.0)),
        );
        entries.insert("domain".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("referenceData".to_string(), field(FieldSpec::optional(0.5)));
        entries.insert(
            "meta".to_string(),
            group([
                ("tier", FieldSpec::required(1.0)),
                ("verified", FieldSpec::optional(0.5)),
            ]),
        );
        entries.insert(
            "resources".to_string(),
            group([
                ("code", FieldSpec::optional(0.5)),
                ("documentation", FieldSpec::required(1.0)),
                ("rules", FieldSpec::optional(0.5)),
                ("tools", FieldSpec::optional(0.3)),
                ("git", FieldSpec::optional(0.5)),
                ("validation", FieldSpec::optional(0.5)),
            ]),
        );
        entries.insert("changelog".to_string(), field(FieldSpec::required(1.0)));
        entries.insert("users".to_string(), field(FieldSpec::optional(0.3)));
        Self { entries }
    }

    /// Expected fields of a data product listing.
    pub fn data_product() -> Self {
        let specs = [
            ("name", FieldSpec::required(1.0)),
            ("description", FieldSpec::required(1.0)),
            ("category", FieldSpec::required(1.0)),
            ("provider", FieldSpec::required(1.0)),
            ("trustworthiness", FieldSpec::required(1.0)),
            ("dataQuality", FieldSpec::optional(0.8)),
            ("freshness", FieldSpec::optional(0.6)),
            ("documentation", FieldSpec::required(1.0)),
            ("schema", FieldSpec::optional(0.7)),
            ("sampleData", FieldSpec::optional(0.5)),
            ("tags", FieldSpec::optional(0.3)),
            ("lastUpdated", FieldSpec::required(0.8)),
            ("version", FieldSpec::optional(0.6)),
            ("downloads", FieldSpec::optional(0.4)),
            ("rating", FieldSpec::optional(0.5)),
            ("usage", FieldSpec::optional(0.3)),
        ];
        let entries = specs
            .into_iter()
            .map(|(name, spec)| (name.to_string(), FieldSpecEntry::Field(spec)))
            .collect();
        Self { entries }
    }
}

impl TryFrom<IndexMap<String, FieldSpecEntry>> for FieldSpecTable {
    type Error = CatalogHealthError;

    fn try_from(entries: IndexMap<String, FieldSpecEntry>) -> Result<Self> {
        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }
}

impl From<FieldSpecTable> for IndexMap<String, FieldSpecEntry> {
    fn from(value: FieldSpecTable) -> Self {
        value.entries
    }
}

/// Incremental builder for [`FieldSpecTable`]; validation runs in `build`.
#[derive(Debug, Default)]
pub struct FieldSpecTableBuilder {
    entries: IndexMap<String, FieldSpecEntry>,
}

impl FieldSpecTableBuilder {
    /// Add a top-level field.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.entries
            .insert(name.into(), FieldSpecEntry::Field(spec));
        self
    }

    /// Add a one-level group of fields.
    pub fn group<'a, I>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, FieldSpec)>,
    {
        self.entries.insert(name.into(), group(fields));
        self
    }

    /// Validate and produce the table.
    pub fn build(self) -> Result<FieldSpecTable> {
        FieldSpecTable::try_from(self.entries)
    }
}

fn group<'a, I>(fields: I) -> FieldSpecEntry
where
    I: IntoIterator<Item = (&'a str, FieldSpec)>,
{
    FieldSpecEntry::Group(
        fields
            .into_iter()
            .map(|(name, spec)| (name.to_string(), spec))
            .collect(),
    )
}

fn validate_name(name: &str, path: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CatalogHealthError::invalid_spec(path, "empty field name"));
    }
    if name.contains('.') {
        return Err(CatalogHealthError::invalid_spec(
            path,
            "field names cannot contain '.'",
        ));
    }
    Ok(())
}

fn validate_weight(path: &str, spec: &FieldSpec) -> Result<()> {
    if !spec.weight.is_finite() || spec.weight <= 0.0 {
        return Err(CatalogHealthError::invalid_spec(
            path,
            format!("weight must be a positive number, got {}", spec.weight),
        ));
    }
    Ok(())
}
