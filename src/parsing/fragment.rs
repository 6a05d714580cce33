use crate::WatchError;
use scraper::{ElementRef, Html, Selector};

/// A read-only view over an HTML snippet, such as a single cell of the
/// recipe table or the body of an item tooltip.
pub struct Fragment {
    html: Html,
}

impl Fragment {
    pub fn parse(markup: &str) -> Self {
        Fragment {
            html: Html::parse_fragment(markup),
        }
    }

    /// Parses `markup` inside a `<div>` so sibling top-level entries share a parent.
    pub fn wrapped(markup: &str) -> Self {
        Self::parse(&format!("<div>{markup}</div>"))
    }

    /// All elements matching `selector`, in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, WatchError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).collect())
    }

    /// Trimmed text of the first match, `None` if nothing matches or the text is empty.
    pub fn first_text(&self, selector: &str) -> Result<Option<String>, WatchError> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next().and_then(text_of))
    }

    /// Attribute of the first match.
    pub fn first_attr(&self, selector: &str, attr: &str) -> Result<Option<String>, WatchError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .html
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string))
    }

    /// Like [`Fragment::first_text`], scoped to the descendants of `element`.
    pub fn element_text(element: &ElementRef, selector: &str) -> Result<Option<String>, WatchError> {
        let selector = parse_selector(selector)?;
        Ok(element.select(&selector).next().and_then(text_of))
    }

    /// Like [`Fragment::first_attr`], scoped to the descendants of `element`.
    pub fn element_attr(
        element: &ElementRef,
        selector: &str,
        attr: &str,
    ) -> Result<Option<String>, WatchError> {
        let selector = parse_selector(selector)?;
        Ok(element
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(str::to_string))
    }
}

fn parse_selector(selector: &str) -> Result<Selector, WatchError> {
    Selector::parse(selector).map_err(|_| WatchError::SelectorError(selector.to_string()))
}

fn text_of(element: ElementRef) -> Option<String> {
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_trims() {
        let fragment = Fragment::parse("<a href='/us/recipe/1/'>  <b> Beer </b></a>");
        assert_eq!(fragment.first_text("b").unwrap(), Some("Beer".to_string()));
    }

    #[test]
    fn test_first_text_empty_is_none() {
        let fragment = Fragment::parse("<b></b><a>Link</a>");
        assert_eq!(fragment.first_text("b").unwrap(), None);
        assert_eq!(fragment.first_text("i").unwrap(), None);
        assert_eq!(fragment.first_text("a").unwrap(), Some("Link".to_string()));
    }

    #[test]
    fn test_first_attr() {
        let fragment = Fragment::parse(r#"<a href="/us/item/9213/">Milk</a><a href="/x">X</a>"#);
        assert_eq!(
            fragment.first_attr("a", "href").unwrap(),
            Some("/us/item/9213/".to_string())
        );
        assert_eq!(fragment.first_attr("a", "title").unwrap(), None);
    }

    #[test]
    fn test_select_by_class_and_scoped_queries() {
        let fragment = Fragment::wrapped(
            r#"<div class="iconset_wrapper_medium"><a href="/us/item/1/">A</a><div class="quantity_small">2</div></div>
               <div class="iconset_wrapper_medium"><a href="/us/item/2/">B</a></div>"#,
        );
        let entries = fragment.select(".iconset_wrapper_medium").unwrap();
        assert_eq!(entries.len(), 2);

        assert_eq!(
            Fragment::element_attr(&entries[1], "a", "href").unwrap(),
            Some("/us/item/2/".to_string())
        );
        assert_eq!(
            Fragment::element_text(&entries[0], ".quantity_small").unwrap(),
            Some("2".to_string())
        );
        assert_eq!(
            Fragment::element_text(&entries[1], ".quantity_small").unwrap(),
            None
        );
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let fragment = Fragment::parse("<b>x</b>");
        assert!(matches!(
            fragment.first_text("[[["),
            Err(WatchError::SelectorError(_))
        ));
    }
}
