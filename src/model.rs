use crate::WatchError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Number of positional fields in a row of the recipe table.
pub const ROW_FIELDS: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub icon: String,
    pub grade: u32,
    pub process: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastery: Option<Mastery>,
    pub exp: f64,
    pub materials: Vec<Item>,
    pub products: Vec<Item>,
}

/// Skill requirement for a recipe, e.g. "Apprentice 1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mastery {
    pub name: String,
    pub level: u32,
}

/// A material or product referenced by a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub grade: u32,
    #[serde(rename = "type")]
    pub item_type: String,
    pub icon: String,
    pub amount: u32,
}

/// Entry of a published baseline file. Only the id matters for diffing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KnownRecipe {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

/// Body of the `query.php?a=recipes` endpoint.
#[derive(Debug, Deserialize)]
pub struct RecipeTable {
    #[serde(rename = "aaData")]
    pub rows: Vec<Value>,
}

/// One validated row of the recipe table:
/// `[id, icon, name, process, mastery, exp, materials, products]`.
#[derive(Debug, Clone)]
pub struct RawRecipeRow {
    fields: Vec<Value>,
}

impl RawRecipeRow {
    pub fn id(&self) -> &Value {
        &self.fields[0]
    }

    pub fn icon_html(&self) -> String {
        value_text(&self.fields[1])
    }

    pub fn name_html(&self) -> String {
        value_text(&self.fields[2])
    }

    pub fn process(&self) -> String {
        value_text(&self.fields[3])
    }

    pub fn mastery(&self) -> &Value {
        &self.fields[4]
    }

    pub fn exp(&self) -> &Value {
        &self.fields[5]
    }

    pub fn materials_html(&self) -> String {
        value_text(&self.fields[6])
    }

    pub fn products_html(&self) -> String {
        value_text(&self.fields[7])
    }
}

impl TryFrom<Value> for RawRecipeRow {
    type Error = WatchError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(fields) if fields.len() >= ROW_FIELDS => Ok(RawRecipeRow { fields }),
            Value::Array(fields) => Err(WatchError::MalformedRow(format!(
                "expected {} fields, got {}",
                ROW_FIELDS,
                fields.len()
            ))),
            other => Err(WatchError::MalformedRow(format!(
                "expected an array, got {}",
                other
            ))),
        }
    }
}

/// Renders a JSON scalar as the text a cell would display. `null` is empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_requires_eight_fields() {
        let short = json!(["1", "", "", "", "", "", ""]);
        assert!(matches!(
            RawRecipeRow::try_from(short),
            Err(WatchError::MalformedRow(_))
        ));

        let not_array = json!({"id": "1"});
        assert!(RawRecipeRow::try_from(not_array).is_err());

        let row = RawRecipeRow::try_from(json!(["1", "i", "n", "Cooking", "", "40", "m", "p"]))
            .unwrap();
        assert_eq!(row.process(), "Cooking");
        assert_eq!(row.materials_html(), "m");
        assert_eq!(row.products_html(), "p");
    }

    #[test]
    fn test_known_recipe_accepts_numeric_ids() {
        let known: Vec<KnownRecipe> =
            serde_json::from_value(json!([{"id": "1", "name": "Beer"}, {"id": 2}])).unwrap();
        assert_eq!(known[0].id, "1");
        assert_eq!(known[1].id, "2");
    }

    #[test]
    fn test_recipe_json_shape() {
        let recipe = Recipe {
            id: "1".to_string(),
            name: "Beer".to_string(),
            icon: "/items/beer.png".to_string(),
            grade: 1,
            process: "Cooking".to_string(),
            mastery: None,
            exp: 400.0,
            materials: vec![Item {
                id: "7005".to_string(),
                name: "Wheat".to_string(),
                grade: 0,
                item_type: "item".to_string(),
                icon: "/items/wheat.png".to_string(),
                amount: 5,
            }],
            products: Vec::new(),
        };

        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("mastery").is_none());
        assert_eq!(value["materials"][0]["type"], "item");

        let back: Recipe = serde_json::from_value(value).unwrap();
        assert_eq!(back, recipe);
    }

    #[test]
    fn test_recipe_table_requires_rows() {
        assert!(serde_json::from_str::<RecipeTable>(r#"{"error": "rate limited"}"#).is_err());

        let table: RecipeTable = serde_json::from_str(r#"{"aaData": []}"#).unwrap();
        assert!(table.rows.is_empty());
    }
}
