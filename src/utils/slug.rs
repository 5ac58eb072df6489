use std::sync::OnceLock;

use regex::Regex;
use unidecode::unidecode;

use crate::models::product::ProductId;

fn non_alnum_regex() -> &'static Regex {
  static RE_NON_ALNUM: OnceLock<Regex> = OnceLock::new();
  RE_NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]+").unwrap())
}

/// Lowercase ascii slug, words joined by single hyphens.
///
/// "  Café Crème 2.0! " becomes "cafe-creme-2-0".
pub fn slugify(input: &str) -> String {
  let ascii = unidecode(input).to_lowercase();
  non_alnum_regex().replace_all(&ascii, "-").trim_matches('-').to_string()
}

/// Path segment for a product page. The id is appended so two products with
/// the same name never share a URL; a product without a usable name gets
/// its id alone.
pub fn product_slug(name: Option<&str>, id: &ProductId) -> String {
  let id_part = slugify(id.as_str());
  let name_part = name.map(slugify).unwrap_or_default();

  match (name_part.is_empty(), id_part.is_empty()) {
    (false, false) => format!("{}-{}", name_part, id_part),
    (true, false) => id_part,
    (false, true) => name_part,
    (true, true) => "product".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_slugify() {
    assert_eq!(slugify("  Café Crème 2.0! "), "cafe-creme-2-0");
    assert_eq!(slugify("Whey__Protein---Isolate"), "whey-protein-isolate");
    assert_eq!(slugify("!!!"), "");
  }

  #[test]
  fn test_product_slug() {
    let id = ProductId::from("P-17");
    assert_eq!(product_slug(Some("Whey Protein"), &id), "whey-protein-p-17");
    assert_eq!(product_slug(None, &id), "p-17");
    assert_eq!(product_slug(Some("★"), &ProductId::from("★")), "product");
  }
}
