use std::fmt;

/// Separator between the type tag and each parameter of a widget spec token.
pub const SPEC_SEPARATOR: char = ',';

/// Editor kinds known to the grid. Host registered kinds use [`WidgetType::Custom`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidgetType {
    /// Defer to the host view's native cell editor.
    Default,
    Int,
    Real,
    Vector2,
    Vector3,
    ColorSelect,
    CheckBox,
    ComboBox,
    String,
    AssetsSelect,
    MultiAssetsSelect,
    NodeSelect,
    /// Reference to a live object by id.
    Res,
    Custom(String),
}

impl WidgetType {
    /// Resolve a type tag. Returns `None` for the empty tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let ty = match tag {
            "" => return None,
            "default" => Self::Default,
            "Int" => Self::Int,
            "Real" => Self::Real,
            "Vector2" => Self::Vector2,
            "Vector3" => Self::Vector3,
            "ColorSelect" => Self::ColorSelect,
            "CheckBox" => Self::CheckBox,
            "ComboBox" => Self::ComboBox,
            "String" => Self::String,
            "AssetsSelect" => Self::AssetsSelect,
            "MultiAssetsSelect" => Self::MultiAssetsSelect,
            "NodeSelect" => Self::NodeSelect,
            "Res" => Self::Res,
            other => Self::Custom(other.to_string()),
        };
        Some(ty)
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Default => "default",
            Self::Int => "Int",
            Self::Real => "Real",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::ColorSelect => "ColorSelect",
            Self::CheckBox => "CheckBox",
            Self::ComboBox => "ComboBox",
            Self::String => "String",
            Self::AssetsSelect => "AssetsSelect",
            Self::MultiAssetsSelect => "MultiAssetsSelect",
            Self::NodeSelect => "NodeSelect",
            Self::Res => "Res",
            Self::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A parsed widget spec: type tag plus ordered parameters.
///
/// Parsing never fails. Empty or malformed input yields an empty tag, which
/// the dispatch registry treats as "no editor available".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WidgetSpec {
    pub tag: String,
    pub params: Vec<String>,
}

impl WidgetSpec {
    pub fn new(widget: &WidgetType, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tag: widget.tag().to_string(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        let mut tokens = raw.split(SPEC_SEPARATOR).map(str::trim);
        let tag = tokens.next().unwrap_or_default();
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Self::default();
        }
        Self {
            tag: tag.to_string(),
            params: tokens.map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tag.is_empty()
    }

    pub fn widget_type(&self) -> Option<WidgetType> {
        WidgetType::from_tag(&self.tag)
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.params.iter().any(|p| p == name)
    }

    /// Re-join into the comma separated token stored in schema documents.
    pub fn to_token(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut token = self.tag.clone();
        for param in &self.params {
            token.push(SPEC_SEPARATOR);
            token.push_str(param);
        }
        token
    }
}
