use gridbind_schema::{PropertyValue, WidgetType};

use crate::adapter::{Edit, EditorAdapter};
use crate::collaborators::EditorContext;

/// Integer or real field. Typed text goes through the expression evaluator.
#[derive(Clone, Debug)]
pub struct NumericInput {
    pub value: f64,
    pub integer: bool,
    text: String,
}

impl NumericInput {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            integer: false,
            text: PropertyValue::Float(value).to_string(),
        }
    }

    pub fn integer(value: i64) -> Self {
        Self {
            value: value as f64,
            integer: true,
            text: value.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn to_value(&self, number: f64) -> PropertyValue {
        if self.integer {
            PropertyValue::Int(number.round() as i64)
        } else {
            PropertyValue::Float(number)
        }
    }
}

impl EditorAdapter for NumericInput {
    fn widget_type(&self) -> WidgetType {
        if self.integer {
            WidgetType::Int
        } else {
            WidgetType::Real
        }
    }

    fn load(&mut self, value: &PropertyValue) {
        let Some(number) = value.as_f64() else {
            return;
        };
        self.value = number;
        self.text = self.to_value(number).to_string();
    }

    fn display(&self) -> String {
        self.text.clone()
    }

    fn apply(&mut self, edit: Edit, _context: &EditorContext) -> bool {
        match edit {
            Edit::Text(text) => {
                self.text = text;
                true
            }
            _ => false,
        }
    }

    fn parse(&self, context: &EditorContext) -> Option<PropertyValue> {
        context.evaluate(&self.text).map(|number| self.to_value(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    struct Doubling;

    impl crate::collaborators::ExpressionEvaluator for Doubling {
        fn evaluate(&self, expression: &str) -> Result<f64> {
            let n: f64 = expression.trim_end_matches("*2").parse()?;
            Ok(n * 2.0)
        }
    }

    #[test]
    fn real_field_commits_evaluated_expression() {
        let context = EditorContext::default().with_evaluator(Doubling);
        let mut input = NumericInput::new(1.0);
        assert!(input.apply(Edit::Text("1.25*2".into()), &context));
        assert_eq!(input.parse(&context), Some(PropertyValue::Float(2.5)));
    }

    #[test]
    fn integer_field_rounds() {
        let context = EditorContext::default();
        let mut input = NumericInput::integer(0);
        input.apply(Edit::Text("6.6".into()), &context);
        assert_eq!(input.parse(&context), Some(PropertyValue::Int(7)));
    }

    #[test]
    fn bad_expression_discards_edit() {
        let context = EditorContext::default();
        let mut input = NumericInput::integer(3);
        input.apply(Edit::Text("three".into()), &context);
        assert_eq!(input.parse(&context), None);
        assert!(!input.apply(Edit::Toggle, &context));
    }

    #[test]
    fn load_formats_stored_value() {
        let mut input = NumericInput::integer(0);
        input.load(&PropertyValue::Int(42));
        assert_eq!(input.display(), "42");
        input.load(&PropertyValue::String("ignored".into()));
        assert_eq!(input.display(), "42");
    }
}
