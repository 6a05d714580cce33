use std::fmt;
use std::str::FromStr;

/// A recipe list tracked by the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Cooking,
    Alchemy,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Cooking, Category::Alchemy];

    /// Value of the `type=` parameter on the recipe query endpoint
    pub fn api_type(&self) -> &'static str {
        match self {
            Category::Cooking => "culinary",
            Category::Alchemy => "alchemy",
        }
    }

    /// Name of the published baseline file and the alert attachment, without extension
    pub fn file_stem(&self) -> &'static str {
        match self {
            Category::Cooking => "cooking",
            Category::Alchemy => "alchemy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cooking => "Cooking",
            Category::Alchemy => "Alchemy",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cooking" | "culinary" => Ok(Category::Cooking),
            "alchemy" => Ok(Category::Alchemy),
            other => Err(format!("unknown recipe category '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category() {
        assert_eq!("cooking".parse::<Category>(), Ok(Category::Cooking));
        assert_eq!("Culinary".parse::<Category>(), Ok(Category::Cooking));
        assert_eq!("ALCHEMY".parse::<Category>(), Ok(Category::Alchemy));
        assert!("processing".parse::<Category>().is_err());
    }

    #[test]
    fn test_names() {
        assert_eq!(Category::Cooking.api_type(), "culinary");
        assert_eq!(Category::Cooking.to_string(), "cooking");
        assert_eq!(Category::Alchemy.label(), "Alchemy");
    }
}
