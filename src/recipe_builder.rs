//! Turns one row of the recipe table into a [`Recipe`].
//!
//! Most cells are HTML snippets. Parse problems fall back to defaults (empty
//! text, grade 0, amount 1). A row without an id, or with an ingredient entry
//! that has no link, is dropped.

use crate::model::{value_text, Item, Mastery, RawRecipeRow, Recipe};
use crate::parsing::{parse_number, substring_between, Fragment};
use crate::resolver::ItemResolver;
use crate::WatchError;
use log::debug;
use reqwest::Url;
use serde_json::Value;

const ENTRY_SELECTOR: &str = ".iconset_wrapper_medium";

/// Builds a recipe from a table row, resolving every material and product.
///
/// Returns `Ok(None)` when the row has no id or an ingredient entry carries
/// no usable link.
/// Network errors from item lookups are returned as-is.
pub async fn build_recipe(
    row: &RawRecipeRow,
    resolver: &ItemResolver,
) -> Result<Option<Recipe>, WatchError> {
    let Some(id) = recipe_id(row.id()) else {
        debug!("Dropping row without an id: {}", row.id());
        return Ok(None);
    };

    let Some(materials) = build_items(&row.materials_html(), resolver).await? else {
        debug!("Dropping recipe {}: unresolvable material", id);
        return Ok(None);
    };
    let Some(products) = build_items(&row.products_html(), resolver).await? else {
        debug!("Dropping recipe {}: unresolvable product", id);
        return Ok(None);
    };

    let name_html = row.name_html();

    Ok(Some(Recipe {
        id,
        name: recipe_name(&name_html)?,
        icon: recipe_icon(&row.icon_html())?,
        grade: grade_of(&name_html),
        process: row.process(),
        mastery: mastery(row.mastery()),
        exp: number_of(row.exp(), 0.0),
        materials,
        products,
    }))
}

/// The id cell is either a plain value or an object with a `display` field.
/// `None` when that value is missing or blank.
pub fn recipe_id(value: &Value) -> Option<String> {
    let id = match value {
        Value::Object(map) => value_text(map.get("display")?),
        other => value_text(other),
    };
    let id = id.trim();
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

fn recipe_name(html: &str) -> Result<String, WatchError> {
    let fragment = Fragment::parse(html);
    if let Some(bold) = fragment.first_text("b")? {
        return Ok(bold);
    }
    Ok(fragment.first_text("a")?.unwrap_or_default())
}

/// The icon cell holds an `<img>` tag as escaped text inside a div. Some rows
/// carry a real `<img>` element instead.
fn recipe_icon(html: &str) -> Result<String, WatchError> {
    let fragment = Fragment::parse(html);
    if let Some(text) = fragment.first_text("div")? {
        if let Some(src) = src_of(&text) {
            return Ok(src);
        }
    }
    Ok(fragment.first_attr("img", "src")?.unwrap_or_default())
}

fn src_of(text: &str) -> Option<String> {
    substring_between(text, "src=\"", "\"")
        .map(|src| html_escape::decode_html_entities(src).into_owned())
}

fn grade_of(html: &str) -> u32 {
    substring_between(html, "item_grade_", " ")
        .map(|grade| parse_number(grade, 0.0))
        .unwrap_or(0.0) as u32
}

/// Parses `{"display": "Apprentice 3"}` into name and level.
fn mastery(value: &Value) -> Option<Mastery> {
    let display = match value {
        Value::Object(map) => map.get("display").map(value_text)?,
        _ => return None,
    };

    let mut words: Vec<&str> = display.split_whitespace().collect();
    let level = words.pop()?;

    Some(Mastery {
        name: words.join(" "),
        level: parse_number(level, 0.0) as u32,
    })
}

fn number_of(value: &Value, fallback: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(fallback),
        other => parse_number(&value_text(other), fallback),
    }
}

/// Resolves every ingredient entry of a materials or products cell, in order.
///
/// `None` if any entry lacks a link that decomposes into a type and id.
async fn build_items(html: &str, resolver: &ItemResolver) -> Result<Option<Vec<Item>>, WatchError> {
    let mut entries = Vec::new();

    // Collect everything we need before awaiting, the parsed DOM isn't Send
    {
        let fragment = Fragment::wrapped(html);
        for element in fragment.select(ENTRY_SELECTOR)? {
            let Some(href) = Fragment::element_attr(&element, "a", "href")? else {
                return Ok(None);
            };
            let Some(reference) = ItemRef::from_url(&href) else {
                return Ok(None);
            };

            let icon = Fragment::element_text(&element, ".icon_wrapper")?
                .and_then(|text| src_of(&text))
                .unwrap_or_default();
            let amount = Fragment::element_text(&element, ".quantity_small")?
                .map(|text| parse_number(&text, 1.0))
                .unwrap_or(1.0);

            entries.push((reference, icon, amount as u32));
        }
    }

    let mut items = Vec::with_capacity(entries.len());
    for (reference, icon, amount) in entries {
        let details = resolver.resolve(&reference.item_type, &reference.id).await?;
        items.push(Item {
            id: reference.id,
            name: details.name,
            grade: details.grade,
            item_type: reference.item_type,
            icon,
            amount,
        });
    }

    Ok(Some(items))
}

/// The `(type, id)` pair encoded in an item link such as `/us/item/9213/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRef {
    pub locale: String,
    pub item_type: String,
    pub id: String,
}

impl ItemRef {
    /// Splits a link into `[locale, type, id...]` path segments. Absolute links
    /// are reduced to their path first. Needs at least locale and type.
    pub fn from_url(href: &str) -> Option<Self> {
        let path = match Url::parse(href) {
            Ok(url) => url.path().to_string(),
            Err(_) => href.to_string(),
        };

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let locale = segments.next()?.to_string();
        let item_type = segments.next()?.to_string();
        let id = segments.collect::<Vec<_>>().join("/");

        Some(ItemRef {
            locale,
            item_type,
            id,
        })
    }
}
