// core/src/report/spec.rs

//! Column layouts of the built-in reports.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnKind {
  /// Plain text; missing values render as an empty string.
  Text,
  /// Money rendered with two fraction digits.
  Currency,
  /// Name of a linked record; missing links render as `N/A`.
  Relation,
  /// The field holds a URL whose bytes are fetched and embedded.
  Image,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
  pub field: &'static str,
  pub header: &'static str,
  pub kind: ColumnKind,
}

impl ColumnSpec {
  pub const fn new(field: &'static str, header: &'static str, kind: ColumnKind) -> Self {
    Self { field, header, kind }
  }

  pub const fn text(field: &'static str, header: &'static str) -> Self {
    Self::new(field, header, ColumnKind::Text)
  }
}

/// A named report: title printed on the document, `<name>.pdf` as file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSpec {
  pub name: &'static str,
  pub title: &'static str,
  pub columns: Vec<ColumnSpec>,
}

impl ReportSpec {
  pub fn file_name(&self) -> String {
    format!("{}.pdf", self.name)
  }

  pub fn actors() -> Self {
    Self {
      name: "ActorsReport",
      title: "Actors Report",
      columns: vec![
        ColumnSpec::new("ProfilePictureURL", "Profile Picture", ColumnKind::Image),
        ColumnSpec::text("FullName", "Full Name"),
        ColumnSpec::text("Bio", "Bio"),
      ],
    }
  }

  pub fn producers() -> Self {
    Self {
      name: "ProducersReport",
      title: "Producers Report",
      columns: vec![
        ColumnSpec::new("ProfilePictureURL", "Profile Picture", ColumnKind::Image),
        ColumnSpec::text("FullName", "Full Name"),
        ColumnSpec::text("Bio", "Bio"),
      ],
    }
  }

  pub fn cinemas() -> Self {
    Self {
      name: "CinemasReport",
      title: "Cinemas Report",
      columns: vec![
        ColumnSpec::new("Logo", "Logo", ColumnKind::Image),
        ColumnSpec::text("Name", "Name"),
        ColumnSpec::text("Description", "Description"),
      ],
    }
  }

  pub fn movies() -> Self {
    Self {
      name: "MoviesReport",
      title: "Movies Report",
      columns: vec![
        ColumnSpec::text("Name", "Name"),
        ColumnSpec::text("Description", "Description"),
        ColumnSpec::new("Price", "Price", ColumnKind::Currency),
        ColumnSpec::text("StartDate", "Start Date"),
        ColumnSpec::text("EndDate", "End Date"),
        ColumnSpec::text("MovieCategory", "Category"),
        ColumnSpec::new("Cinema", "Cinema", ColumnKind::Relation),
        ColumnSpec::new("Producer", "Producer Name", ColumnKind::Relation),
      ],
    }
  }

  pub fn order_items() -> Self {
    Self {
      name: "OrderItemsReport",
      title: "Order Items Report",
      columns: vec![
        ColumnSpec::text("Amount", "Amount"),
        ColumnSpec::new("Price", "Price", ColumnKind::Currency),
        ColumnSpec::new("Movie", "Movie", ColumnKind::Relation),
        ColumnSpec::new("Order", "Order", ColumnKind::Relation),
      ],
    }
  }
}
