//! Line-item value objects for orders, proposals and revisions.
//!
//! A line item's wire representation varies along three orthogonal axes:
//! media kind (print/digital), role (buyer vs seller -- the upstream API
//! names and nests the same semantic values differently per side), and
//! package role (standalone, package header, roadblock header, child).
//! [`LineItem::to_wire`] is a pure function over that tuple; nothing is
//! inherited or overridden.

use std::fmt;

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::config;
use crate::error::{PatsError, Result};
use crate::models::validate_external_id;

// ---------------------------------------------------------------------------
// Tag enums
// ---------------------------------------------------------------------------

/// Which side of the marketplace is producing the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Buyer,
    Seller,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Print,
    Digital,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Print => "PRINT",
            MediaKind::Digital => "DIGITAL",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the line participates in package grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageType {
    #[default]
    Standalone,
    /// Grouping header for a package; carries the commercial totals but no
    /// buy type/category of its own.
    Package,
    /// Grouping header for a roadblock (simultaneous placements).
    Roadblock,
    /// Member of a package; inherits commercial terms from its parent.
    Child,
}

impl PackageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PackageType::Standalone => "Standalone",
            PackageType::Package => "Package",
            PackageType::Roadblock => "Roadblock",
            PackageType::Child => "Child",
        }
    }

    /// Package and Roadblock lines are grouping headers.
    pub fn is_grouping_header(self) -> bool {
        matches!(self, PackageType::Package | PackageType::Roadblock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuyType {
    #[default]
    Standard,
    /// One lump price for the line; no per-unit rate applies.
    FlatFee,
    AddedValue,
    Bonus,
}

impl BuyType {
    pub fn as_str(self) -> &'static str {
        match self {
            BuyType::Standard => "Standard",
            BuyType::FlatFee => "Flat Fee",
            BuyType::AddedValue => "Added Value",
            BuyType::Bonus => "Bonus",
        }
    }

    pub fn is_flat_fee(self) -> bool {
        matches!(self, BuyType::FlatFee)
    }
}

/// Revision operation applied to a line item already known upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "Add",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }
}

/// Numeric formatting convention for money fields.
///
/// The upstream wire format changed between API generations: older
/// payloads carry fixed-point strings (`"30000.00"`, `"15.0000"`), newer
/// ones rounded JSON numbers. One profile is picked per client and never
/// mixed within a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WireProfile {
    /// Rate at 4 decimal places, costs at 2, as JSON strings.
    #[default]
    FixedPointStrings,
    /// Rate rounded to 4 decimal places, costs to 2, as JSON numbers.
    Numbers,
}

fn rate_value(rate: f64, profile: WireProfile) -> Value {
    match profile {
        WireProfile::FixedPointStrings => Value::String(format!("{:.4}", rate)),
        WireProfile::Numbers => json!((rate * 10_000.0).round() / 10_000.0),
    }
}

fn cost_value(cost: f64, profile: WireProfile) -> Value {
    match profile {
        WireProfile::FixedPointStrings => Value::String(format!("{:.2}", cost)),
        WireProfile::Numbers => json!((cost * 100.0).round() / 100.0),
    }
}

fn wire_date(date: NaiveDate) -> Value {
    Value::String(date.format("%Y-%m-%d").to_string())
}

// ---------------------------------------------------------------------------
// Media payloads
// ---------------------------------------------------------------------------

/// One period of a digital flighting schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub unit_amount: i64,
    pub planned_cost: f64,
}

/// Print size descriptor.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintSize {
    /// Named size, e.g. `"25x4"` or `"Full Page"`.
    pub size_type: String,
    pub units: Option<i64>,
    pub columns: Option<i64>,
}

/// Print-only attributes. All fields optional; defaults omit them from
/// the wire form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrintDetail {
    pub color: Option<String>,
    pub cover_date: Option<NaiveDate>,
    pub sale_date: Option<NaiveDate>,
    pub copy_deadline: Option<NaiveDate>,
    pub position: Option<String>,
    pub position_guaranteed: bool,
    pub size: Option<PrintSize>,
    pub region: Option<String>,
}

/// Digital-only attributes. A line carries either a single flight range
/// or a flighting schedule, never both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DigitalDetail {
    pub flight_start: Option<NaiveDate>,
    pub flight_end: Option<NaiveDate>,
    pub flighting: Vec<Flight>,
    /// Who serves the creative; validated against [`config::SERVED_BY`].
    pub served_by: Option<String>,
    pub dimensions: Option<String>,
    pub dimensions_position: Option<String>,
    pub creative_type: Option<String>,
    /// External id of the package header this child belongs to.
    pub parent_external_id: Option<String>,
    pub primary_placement: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetail {
    Print(PrintDetail),
    Digital(DigitalDetail),
}

impl MediaDetail {
    pub fn kind(&self) -> MediaKind {
        match self {
            MediaDetail::Print(_) => MediaKind::Print,
            MediaDetail::Digital(_) => MediaKind::Digital,
        }
    }
}

// ---------------------------------------------------------------------------
// LineItem
// ---------------------------------------------------------------------------

/// One placement within an order, proposal or revision.
///
/// Constructed fully populated via [`LineItem::print`] or
/// [`LineItem::digital`]; the only post-construction mutation is
/// [`set_operation`](LineItem::set_operation).
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub line_item_id: Option<String>,
    pub external_id: String,
    pub reference_id: Option<String>,
    pub line_number: Option<i64>,
    pub placement_name: String,
    pub section: Option<String>,
    pub subsection: Option<String>,
    pub sub_media_type: Option<String>,
    pub buy_type: BuyType,
    pub buy_category: Option<String>,
    pub unit_type: Option<String>,
    pub unit_amount: Option<i64>,
    pub cost_method: Option<String>,
    pub rate: Option<f64>,
    pub planned_cost: Option<f64>,
    pub package_type: PackageType,
    pub package_name: Option<String>,
    pub comments: Option<String>,
    pub target: bool,
    pub media: MediaDetail,
    operation: Option<Operation>,
}

impl LineItem {
    /// Start building a print line item.
    pub fn print(
        external_id: impl Into<String>,
        placement_name: impl Into<String>,
        detail: PrintDetail,
    ) -> LineItemBuilder {
        LineItemBuilder::new(external_id, placement_name, MediaDetail::Print(detail))
    }

    /// Start building a digital line item.
    pub fn digital(
        external_id: impl Into<String>,
        placement_name: impl Into<String>,
        detail: DigitalDetail,
    ) -> LineItemBuilder {
        LineItemBuilder::new(external_id, placement_name, MediaDetail::Digital(detail))
    }

    pub fn media_kind(&self) -> MediaKind {
        self.media.kind()
    }

    /// Mark the revision operation this line carries. The only mutation a
    /// line item permits after construction.
    pub fn set_operation(&mut self, operation: Operation) {
        self.operation = Some(operation);
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    /// Produce the wire mapping for this line under the given role and
    /// numeric profile.
    ///
    /// Field inclusion by package role:
    /// - always: identifiers, `packageType`, `comments`, `target`;
    /// - buy type/category omitted on Package and Roadblock headers;
    /// - unit/cost/rate omitted on Child lines, and `rate` also omitted
    ///   when the buy type is a flat fee.
    ///
    /// Role divergence (an upstream contract fact, reproduced as-is): the
    /// buyer side emits `placementName`/`subsection`/`subMediaType` at top
    /// level; the seller side renames the placement field to `name` and
    /// folds `subMediaType`/`subsection` into a `customColumns` list.
    pub fn to_wire(&self, role: Role, profile: WireProfile) -> Value {
        let mut dict = Map::new();

        if let Some(op) = self.operation {
            dict.insert("operation".into(), json!(op.as_str()));
        }
        if let Some(id) = &self.line_item_id {
            dict.insert("lineItemId".into(), json!(id));
        }
        dict.insert("externalPlacementId".into(), json!(self.external_id));
        if let Some(reference) = &self.reference_id {
            dict.insert("placementNumber".into(), json!(reference));
        }
        if let Some(number) = self.line_number {
            dict.insert("lineNumber".into(), json!(number));
        }

        match role {
            Role::Buyer => {
                dict.insert("placementName".into(), json!(self.placement_name));
                if let Some(subsection) = &self.subsection {
                    dict.insert("subsection".into(), json!(subsection));
                }
                if let Some(sub_media) = &self.sub_media_type {
                    dict.insert("subMediaType".into(), json!(sub_media));
                }
            }
            Role::Seller => {
                dict.insert("name".into(), json!(self.placement_name));
                let mut custom = Vec::new();
                if let Some(sub_media) = &self.sub_media_type {
                    custom.push(json!({"name": "subMediaType", "value": sub_media}));
                }
                if let Some(subsection) = &self.subsection {
                    custom.push(json!({"name": "subsection", "value": subsection}));
                }
                if !custom.is_empty() {
                    dict.insert("customColumns".into(), Value::Array(custom));
                }
            }
        }

        if let Some(section) = &self.section {
            dict.insert("section".into(), json!(section));
        }

        if !self.package_type.is_grouping_header() {
            dict.insert("buyType".into(), json!(self.buy_type.as_str()));
            if let Some(category) = &self.buy_category {
                dict.insert("buyCategory".into(), json!(category));
            }
        }

        if self.package_type != PackageType::Child {
            if let Some(unit_type) = &self.unit_type {
                dict.insert("unitType".into(), json!(unit_type));
            }
            if let Some(amount) = self.unit_amount {
                dict.insert("unitAmount".into(), json!(amount));
            }
            if let Some(method) = &self.cost_method {
                dict.insert("costMethod".into(), json!(method));
            }
            if !self.buy_type.is_flat_fee() {
                if let Some(rate) = self.rate {
                    dict.insert("rate".into(), rate_value(rate, profile));
                }
            }
            if let Some(cost) = self.planned_cost {
                dict.insert("plannedCost".into(), cost_value(cost, profile));
            }
        }

        dict.insert("packageType".into(), json!(self.package_type.as_str()));
        if let Some(name) = &self.package_name {
            dict.insert("packageName".into(), json!(name));
        }
        if let Some(comments) = &self.comments {
            dict.insert("comments".into(), json!(comments));
        }
        dict.insert("target".into(), json!(self.target));

        match &self.media {
            MediaDetail::Print(print) => extend_print(&mut dict, print),
            MediaDetail::Digital(digital) => extend_digital(&mut dict, digital, self, profile),
        }

        Value::Object(dict)
    }
}

fn extend_print(dict: &mut Map<String, Value>, print: &PrintDetail) {
    if let Some(color) = &print.color {
        dict.insert("color".into(), json!(color));
    }
    if let Some(date) = print.cover_date {
        dict.insert("coverDate".into(), wire_date(date));
    }
    if let Some(date) = print.sale_date {
        dict.insert("saleDate".into(), wire_date(date));
    }
    if let Some(date) = print.copy_deadline {
        dict.insert("copyDeadline".into(), wire_date(date));
    }
    if let Some(position) = &print.position {
        dict.insert("printPosition".into(), json!(position));
        dict.insert(
            "isPositionGuaranteed".into(),
            json!(print.position_guaranteed),
        );
    }
    if let Some(size) = &print.size {
        let mut size_dict = Map::new();
        size_dict.insert("type".into(), json!(size.size_type));
        if let Some(units) = size.units {
            size_dict.insert("units".into(), json!(units));
        }
        if let Some(columns) = size.columns {
            size_dict.insert("columns".into(), json!(columns));
        }
        dict.insert("size".into(), Value::Object(size_dict));
    }
    if let Some(region) = &print.region {
        dict.insert("region".into(), json!(region));
    }
}

fn extend_digital(
    dict: &mut Map<String, Value>,
    digital: &DigitalDetail,
    item: &LineItem,
    profile: WireProfile,
) {
    if digital.flighting.is_empty() {
        if let Some(date) = digital.flight_start {
            dict.insert("flightStart".into(), wire_date(date));
        }
        if let Some(date) = digital.flight_end {
            dict.insert("flightEnd".into(), wire_date(date));
        }
    } else {
        let periods: Vec<Value> = digital
            .flighting
            .iter()
            .map(|flight| {
                json!({
                    "startDate": wire_date(flight.start_date),
                    "endDate": wire_date(flight.end_date),
                    "unitAmount": flight.unit_amount,
                    "plannedCost": cost_value(flight.planned_cost, profile),
                })
            })
            .collect();
        dict.insert("flighting".into(), Value::Array(periods));
    }
    if let Some(served_by) = &digital.served_by {
        dict.insert("servedBy".into(), json!(served_by));
    }
    if let Some(dimensions) = &digital.dimensions {
        dict.insert("dimensions".into(), json!(dimensions));
    }
    if let Some(position) = &digital.dimensions_position {
        dict.insert("dimensionsPosition".into(), json!(position));
    }
    if let Some(creative) = &digital.creative_type {
        dict.insert("creativeType".into(), json!(creative));
    }
    if item.package_type == PackageType::Child {
        if let Some(parent) = &digital.parent_external_id {
            dict.insert("parentExternalPlacementId".into(), json!(parent));
        }
    }
    if digital.primary_placement {
        dict.insert("primaryPlacement".into(), json!(true));
    }
}

// ---------------------------------------------------------------------------
// LineItemBuilder
// ---------------------------------------------------------------------------

/// Builder for [`LineItem`]. Construction validates the controlled
/// vocabularies and length caps, so a bad line never reaches the wire.
pub struct LineItemBuilder {
    item: LineItem,
}

impl LineItemBuilder {
    fn new(
        external_id: impl Into<String>,
        placement_name: impl Into<String>,
        media: MediaDetail,
    ) -> Self {
        Self {
            item: LineItem {
                line_item_id: None,
                external_id: external_id.into(),
                reference_id: None,
                line_number: None,
                placement_name: placement_name.into(),
                section: None,
                subsection: None,
                sub_media_type: None,
                buy_type: BuyType::default(),
                buy_category: None,
                unit_type: None,
                unit_amount: None,
                cost_method: None,
                rate: None,
                planned_cost: None,
                package_type: PackageType::default(),
                package_name: None,
                comments: None,
                target: false,
                media,
                operation: None,
            },
        }
    }

    /// Internal id assigned by PATS, known on updates and revisions.
    pub fn line_item_id(mut self, id: impl Into<String>) -> Self {
        self.item.line_item_id = Some(id.into());
        self
    }

    pub fn reference_id(mut self, id: impl Into<String>) -> Self {
        self.item.reference_id = Some(id.into());
        self
    }

    pub fn line_number(mut self, number: i64) -> Self {
        self.item.line_number = Some(number);
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.item.section = Some(section.into());
        self
    }

    pub fn subsection(mut self, subsection: impl Into<String>) -> Self {
        self.item.subsection = Some(subsection.into());
        self
    }

    pub fn sub_media_type(mut self, sub_media_type: impl Into<String>) -> Self {
        self.item.sub_media_type = Some(sub_media_type.into());
        self
    }

    /// Defaults to [`BuyType::Standard`].
    pub fn buy_type(mut self, buy_type: BuyType) -> Self {
        self.item.buy_type = buy_type;
        self
    }

    pub fn buy_category(mut self, category: impl Into<String>) -> Self {
        self.item.buy_category = Some(category.into());
        self
    }

    pub fn units(mut self, amount: i64, unit_type: impl Into<String>) -> Self {
        self.item.unit_amount = Some(amount);
        self.item.unit_type = Some(unit_type.into());
        self
    }

    pub fn cost_method(mut self, method: impl Into<String>) -> Self {
        self.item.cost_method = Some(method.into());
        self
    }

    pub fn rate(mut self, rate: f64) -> Self {
        self.item.rate = Some(rate);
        self
    }

    pub fn planned_cost(mut self, cost: f64) -> Self {
        self.item.planned_cost = Some(cost);
        self
    }

    /// Defaults to [`PackageType::Standalone`].
    pub fn package_type(mut self, package_type: PackageType) -> Self {
        self.item.package_type = package_type;
        self
    }

    pub fn package_name(mut self, name: impl Into<String>) -> Self {
        self.item.package_name = Some(name.into());
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.item.comments = Some(comments.into());
        self
    }

    pub fn target(mut self, target: bool) -> Self {
        self.item.target = target;
        self
    }

    /// Validate and finish the line item.
    pub fn build(self) -> Result<LineItem> {
        let item = self.item;
        validate_external_id("externalPlacementId", &item.external_id)?;

        if let Some(sub_media) = &item.sub_media_type {
            let allowed = config::media_subtypes(item.media_kind());
            if !allowed.contains(&sub_media.as_str()) {
                return Err(PatsError::InvalidArgument(format!(
                    "subMediaType '{}' is not valid for {} lines; must be one of {}",
                    sub_media,
                    item.media_kind(),
                    allowed.join(", ")
                )));
            }
        }

        if let Some(category) = &item.buy_category {
            match config::buy_categories(item.media_kind(), item.package_type) {
                Some(allowed) => {
                    if !allowed.contains(&category.as_str()) {
                        return Err(PatsError::InvalidArgument(format!(
                            "buyCategory '{}' is not valid for {} {} lines; must be one of {}",
                            category,
                            item.media_kind(),
                            item.package_type.as_str(),
                            allowed.join(", ")
                        )));
                    }
                }
                None => {
                    return Err(PatsError::InvalidArgument(format!(
                        "buyCategory cannot be set on a {} line",
                        item.package_type.as_str()
                    )));
                }
            }
        }

        if let MediaDetail::Digital(digital) = &item.media {
            if let Some(served_by) = &digital.served_by {
                if !config::SERVED_BY.contains(&served_by.as_str()) {
                    return Err(PatsError::InvalidArgument(format!(
                        "servedBy '{}' must be one of {}",
                        served_by,
                        config::SERVED_BY.join(", ")
                    )));
                }
            }
            if let Some(parent) = &digital.parent_external_id {
                validate_external_id("parentExternalPlacementId", parent)?;
            }
            let has_range = digital.flight_start.is_some() || digital.flight_end.is_some();
            if has_range && !digital.flighting.is_empty() {
                return Err(PatsError::InvalidArgument(
                    "a line item carries either a flight range or a flighting schedule, not both"
                        .to_string(),
                ));
            }
        }

        Ok(item)
    }
}
