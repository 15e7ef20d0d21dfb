use serde::Serialize;
use std::fmt;

/// Listings with at most this many pages show every page number
const MAX_UNCOLLAPSED_PAGES: u32 = 7;

/// A single label in a pagination control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "number", rename_all = "snake_case")]
pub enum PageToken {
  Page(u32),
  Ellipsis,
}

impl fmt::Display for PageToken {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PageToken::Page(number) => write!(f, "{}", number),
      PageToken::Ellipsis => f.write_str("..."),
    }
  }
}

/// Builds the ordered labels for a pagination control.
///
/// Both arguments are 1-based and assumed to be positive; `current_page`
/// is assumed to lie within `1..=total_pages`.
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageToken> {
  use PageToken::{Ellipsis, Page};

  if total_pages <= MAX_UNCOLLAPSED_PAGES {
    return (1..=total_pages).map(Page).collect();
  }

  // Near the start: first three pages, then the last two
  if current_page <= 3 {
    return vec![
      Page(1),
      Page(2),
      Page(3),
      Ellipsis,
      Page(total_pages - 1),
      Page(total_pages),
    ];
  }

  // Near the end: first two pages, then the last three
  if current_page >= total_pages - 2 {
    return vec![
      Page(1),
      Page(2),
      Ellipsis,
      Page(total_pages - 2),
      Page(total_pages - 1),
      Page(total_pages),
    ];
  }

  vec![
    Page(1),
    Ellipsis,
    Page(current_page - 1),
    Page(current_page),
    Page(current_page + 1),
    Ellipsis,
    Page(total_pages),
  ]
}

/// Everything a listing template needs to draw its pagination control
#[derive(Debug, Clone, Serialize)]
pub struct PaginationView {
  pub current_page: u32,
  pub total_pages: u32,
  pub tokens: Vec<PageToken>,
  pub previous_page: Option<u32>,
  pub next_page: Option<u32>,
}

impl PaginationView {
  pub fn new(current_page: u32, total_pages: u32) -> Self {
    let previous_page = (current_page > 1).then(|| current_page - 1);
    let next_page = (current_page < total_pages).then(|| current_page + 1);

    Self {
      current_page,
      total_pages,
      tokens: generate_pagination(current_page, total_pages),
      previous_page,
      next_page,
    }
  }
}
