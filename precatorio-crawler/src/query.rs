//! Typed request builder for the semantic query endpoint.
//!
//! Requests are assembled from named parts (entity filter, year filter,
//! window, restart token, sort direction) and only become JSON when the
//! transport serializes them.

use precatorio_core::{ConfigError, SourceConfig};
use precatorio_dsr::ContinuationToken;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// TEMPLATE
// ============================================================================

/// One selected column of the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateColumn {
    pub property: &'static str,
    /// Selected as `Sum(Table.property)`.
    pub summed: bool,
}

const fn plain(property: &'static str) -> TemplateColumn {
    TemplateColumn {
        property,
        summed: false,
    }
}

const fn summed(property: &'static str) -> TemplateColumn {
    TemplateColumn {
        property,
        summed: true,
    }
}

/// Columns of the payment schedule visual, in projection order.
pub const PRECATORIO_COLUMNS: [TemplateColumn; 10] = [
    plain("dfslcp_dsc_proc_precatorio"),
    summed("dfslcp_num_ano_orcamento"),
    plain("dfslcp_dsc_natureza"),
    plain("dfslcp_dat_cadastro"),
    plain("dfslcp_dsc_tipo_classificao"),
    summed("dfslcp_vlr_original"),
    summed("dfslcp_num_ordem"),
    plain("dfslcp_dsc_sit_precatorio"),
    plain("dfslcp_dsc_comarca"),
    plain("ValorAtualFormatado"),
];

/// Shape of the request, independent of any one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate {
    pub source_alias: &'static str,
    pub columns: Vec<TemplateColumn>,
    /// Column the entity filter applies to.
    pub entity_property: &'static str,
    /// Column the optional year filter applies to.
    pub year_property: &'static str,
    /// Column rows are ordered by.
    pub order_property: &'static str,
}

impl Default for QueryTemplate {
    fn default() -> Self {
        Self {
            source_alias: "d",
            columns: PRECATORIO_COLUMNS.to_vec(),
            entity_property: "dfslcp_dsc_entidade",
            year_property: "dfslcp_num_ano_orcamento",
            order_property: "dfslcp_num_ordem",
        }
    }
}

impl QueryTemplate {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.columns.is_empty() {
            return Err(ConfigError::MalformedTemplate {
                reason: "no columns selected".to_string(),
            });
        }
        for (idx, column) in self.columns.iter().enumerate() {
            if column.property.trim().is_empty() {
                return Err(ConfigError::MalformedTemplate {
                    reason: format!("column {} has an empty property", idx),
                });
            }
            if self.columns[..idx].iter().any(|c| c.property == column.property) {
                return Err(ConfigError::MalformedTemplate {
                    reason: format!("column '{}' selected twice", column.property),
                });
            }
        }
        if !self.columns.iter().any(|c| c.property == self.order_property) {
            return Err(ConfigError::MalformedTemplate {
                reason: format!("order column '{}' is not selected", self.order_property),
            });
        }
        if self.source_alias.is_empty() || self.entity_property.is_empty() || self.year_property.is_empty() {
            return Err(ConfigError::MalformedTemplate {
                reason: "alias, entity and year properties must be set".to_string(),
            });
        }
        Ok(())
    }
}

// ============================================================================
// PAGE REQUEST
// ============================================================================

/// Row order. The first window is ascending; continuation windows are
/// requested descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    fn wire(self) -> u8 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => 2,
        }
    }
}

/// Everything that varies between page requests.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub official_name: String,
    pub year: Option<i32>,
    pub page_size: u32,
    pub restart_token: Option<ContinuationToken>,
    pub sort: SortDirection,
}

impl PageRequest {
    /// First page for an entity.
    pub fn first(official_name: impl Into<String>, year: Option<i32>, page_size: u32) -> Self {
        Self {
            official_name: official_name.into(),
            year,
            page_size,
            restart_token: None,
            sort: SortDirection::Ascending,
        }
    }

    /// Follow-up page continuing from `token`.
    pub fn continue_from(&self, token: ContinuationToken) -> Self {
        Self {
            restart_token: Some(token),
            sort: SortDirection::Descending,
            ..self.clone()
        }
    }
}

// ============================================================================
// WIRE MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRequest {
    pub version: String,
    pub queries: Vec<QueryEntry>,
    #[serde(rename = "cancelQueries")]
    pub cancel_queries: Vec<Value>,
    #[serde(rename = "modelId")]
    pub model_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryEntry {
    pub query: QueryCommands,
    pub query_id: String,
    pub application_context: ApplicationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryCommands {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Command {
    pub semantic_query_data_shape_command: DataShapeCommand,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataShapeCommand {
    pub query: SemanticQuery,
    pub binding: Binding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_metrics_kind: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SemanticQuery {
    pub version: u8,
    pub from: Vec<FromSource>,
    pub select: Vec<SelectItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub r#where: Vec<WhereClause>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderByClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FromSource {
    pub name: String,
    pub entity: String,
    #[serde(rename = "Type")]
    pub kind: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnRef {
    pub expression: SourceRefExpr,
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceRefExpr {
    pub source_ref: SourceRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SourceRef {
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnExpr {
    pub column: ColumnRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Aggregation {
    pub expression: ColumnExpr,
    /// 0 = Sum
    pub function: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<Aggregation>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WhereClause {
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Condition {
    #[serde(rename = "In")]
    pub in_values: InCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InCondition {
    pub expressions: Vec<ColumnExpr>,
    pub values: Vec<Vec<LiteralExpr>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LiteralExpr {
    pub literal: Literal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Literal {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderByClause {
    pub direction: u8,
    pub expression: ColumnExpr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Binding {
    pub primary: BindingPrimary,
    pub data_reduction: DataReduction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_empty_groups: Option<bool>,
    pub version: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BindingPrimary {
    pub groupings: Vec<Grouping>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Grouping {
    pub projections: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtotal: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataReduction {
    pub data_volume: u8,
    pub primary: ReductionPrimary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReductionPrimary {
    pub window: Window,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Window {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restart_tokens: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationContext {
    pub dataset_id: String,
    pub sources: Vec<ReportSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportSource {
    pub report_id: String,
    pub visual_id: String,
}

// ============================================================================
// BUILDER
// ============================================================================

/// Quote an entity name as a semantic query string literal.
fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds page requests from a validated template.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    template: QueryTemplate,
    source_table: String,
    model_id: u64,
    dataset_id: String,
    report_id: String,
    visual_id: String,
}

impl QueryBuilder {
    /// Create a builder over the default payment schedule template.
    pub fn new(source: &SourceConfig) -> Result<Self, ConfigError> {
        Self::with_template(source, QueryTemplate::default())
    }

    /// Create a builder over a custom template.
    ///
    /// # Errors
    /// `ConfigError::MalformedTemplate` when the template cannot produce a
    /// valid request.
    pub fn with_template(source: &SourceConfig, template: QueryTemplate) -> Result<Self, ConfigError> {
        template.validate()?;
        if source.source_table.trim().is_empty() {
            return Err(ConfigError::MalformedTemplate {
                reason: "source table is empty".to_string(),
            });
        }
        Ok(Self {
            template,
            source_table: source.source_table.clone(),
            model_id: source.model_id,
            dataset_id: source.dataset_id.clone(),
            report_id: source.report_id.clone(),
            visual_id: source.visual_id.clone(),
        })
    }

    /// Wire names the response descriptor will carry, in column order.
    pub fn wire_names(&self) -> Vec<String> {
        self.template
            .columns
            .iter()
            .map(|c| self.wire_name(c))
            .collect()
    }

    fn wire_name(&self, column: &TemplateColumn) -> String {
        let qualified = format!("{}.{}", self.source_table, column.property);
        if column.summed {
            format!("Sum({})", qualified)
        } else {
            qualified
        }
    }

    fn column_ref(&self, property: &str) -> ColumnRef {
        ColumnRef {
            expression: SourceRefExpr {
                source_ref: SourceRef {
                    source: self.template.source_alias.to_string(),
                },
            },
            property: property.to_string(),
        }
    }

    fn column_expr(&self, property: &str) -> ColumnExpr {
        ColumnExpr {
            column: self.column_ref(property),
        }
    }

    fn select_item(&self, column: &TemplateColumn) -> SelectItem {
        let name = self.wire_name(column);
        if column.summed {
            SelectItem {
                column: None,
                aggregation: Some(Aggregation {
                    expression: self.column_expr(column.property),
                    function: 0,
                }),
                name,
            }
        } else {
            SelectItem {
                column: Some(self.column_ref(column.property)),
                aggregation: None,
                name,
            }
        }
    }

    fn in_clause(&self, property: &str, literal: String) -> WhereClause {
        WhereClause {
            condition: Condition {
                in_values: InCondition {
                    expressions: vec![self.column_expr(property)],
                    values: vec![vec![LiteralExpr {
                        literal: Literal { value: literal },
                    }]],
                },
            },
        }
    }

    fn envelope(&self, query: SemanticQuery, binding: Binding, metrics: Option<u8>) -> QueryRequest {
        QueryRequest {
            version: "1.0.0".to_string(),
            queries: vec![QueryEntry {
                query: QueryCommands {
                    commands: vec![Command {
                        semantic_query_data_shape_command: DataShapeCommand {
                            query,
                            binding,
                            execution_metrics_kind: metrics,
                        },
                    }],
                },
                query_id: String::new(),
                application_context: ApplicationContext {
                    dataset_id: self.dataset_id.clone(),
                    sources: vec![ReportSource {
                        report_id: self.report_id.clone(),
                        visual_id: self.visual_id.clone(),
                    }],
                },
            }],
            cancel_queries: Vec::new(),
            model_id: self.model_id,
        }
    }

    fn from_clause(&self) -> Vec<FromSource> {
        vec![FromSource {
            name: self.template.source_alias.to_string(),
            entity: self.source_table.clone(),
            kind: 0,
        }]
    }

    /// Build the request for one page.
    pub fn build(&self, page: &PageRequest) -> QueryRequest {
        let mut filters = vec![self.in_clause(
            self.template.entity_property,
            string_literal(&page.official_name),
        )];
        if let Some(year) = page.year {
            filters.push(self.in_clause(self.template.year_property, format!("{}L", year)));
        }

        let query = SemanticQuery {
            version: 2,
            from: self.from_clause(),
            select: self
                .template
                .columns
                .iter()
                .map(|c| self.select_item(c))
                .collect(),
            r#where: filters,
            order_by: vec![OrderByClause {
                direction: page.sort.wire(),
                expression: self.column_expr(self.template.order_property),
            }],
        };
        let binding = Binding {
            primary: BindingPrimary {
                groupings: vec![Grouping {
                    projections: (0..self.template.columns.len()).collect(),
                    subtotal: Some(1),
                }],
            },
            data_reduction: DataReduction {
                data_volume: 3,
                primary: ReductionPrimary {
                    window: Window {
                        count: Some(page.page_size),
                        restart_tokens: page.restart_token.as_ref().map(|t| t.as_value().clone()),
                    },
                },
            },
            include_empty_groups: None,
            version: 1,
        };
        self.envelope(query, binding, Some(1))
    }

    /// Build the request listing every entity name in the report.
    pub fn build_entity_listing(&self) -> QueryRequest {
        let property = self.template.entity_property;
        let query = SemanticQuery {
            version: 2,
            from: self.from_clause(),
            select: vec![SelectItem {
                column: Some(self.column_ref(property)),
                aggregation: None,
                name: format!("{}.{}", self.source_table, property),
            }],
            r#where: Vec::new(),
            order_by: Vec::new(),
        };
        let binding = Binding {
            primary: BindingPrimary {
                groupings: vec![Grouping {
                    projections: vec![0],
                    subtotal: None,
                }],
            },
            data_reduction: DataReduction {
                data_volume: 3,
                primary: ReductionPrimary {
                    window: Window {
                        count: None,
                        restart_tokens: None,
                    },
                },
            },
            include_empty_groups: Some(true),
            version: 1,
        };
        self.envelope(query, binding, None)
    }
}

// ============================================================================
// TESTS
// ============================================================================
