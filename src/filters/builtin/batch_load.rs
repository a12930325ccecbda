//! Directory batch loader node.

use crate::core::context::{ExecutionContext, ValidationContext};
use crate::core::error::{ExecutionError, ValidationError};
use crate::core::fingerprint::fingerprint;
use crate::core::node::{Category, ChangeHint, FilterNode, NodeMetadata};
use crate::core::port::{Constraint, ParameterDefinition, PortDefinition, UiHint};
use crate::core::types::{PortType, Value};
use crate::filters::registry::FilterRegistry;
use crate::loader::{load_batch_with_progress, BatchLoadOptions, SortMethod};
use log::warn;

/// Register the batch loader.
pub fn register(registry: &mut FilterRegistry) {
    registry.register(|| Box::new(BatchLoadImagesWithNames));
}

/// Loads every supported image in a directory, with paths and names.
#[derive(Debug, Clone)]
pub struct BatchLoadImagesWithNames;

impl BatchLoadImagesWithNames {
    /// Id the node is registered under.
    pub const ID: &'static str = "BatchLoadImagesWithNames";
    /// Name shown in the host's node menu.
    pub const DISPLAY_NAME: &'static str = "Batch Load Images With Names";

    fn options(ctx: &ExecutionContext) -> Result<BatchLoadOptions, ExecutionError> {
        let directory = ctx.get_string("directory")?;
        let cap = ctx.get_optional_integer("image_load_cap")?.unwrap_or(0);
        let start_index = ctx.get_optional_integer("start_index")?.unwrap_or(0);
        let load_always = ctx.get_optional_bool("load_always")?.unwrap_or(false);

        let sort_method = match ctx.get_optional_string("sort_method")? {
            None => SortMethod::None,
            Some(label) => label.parse().unwrap_or_else(|err| {
                warn!("{}, keeping listing order", err);
                SortMethod::None
            }),
        };

        Ok(BatchLoadOptions::new(directory)
            .with_load_cap(usize::try_from(cap).unwrap_or(0))
            .with_start_index(start_index)
            .with_load_always(load_always)
            .with_sort_method(sort_method))
    }
}

impl FilterNode for BatchLoadImagesWithNames {
    fn metadata(&self) -> NodeMetadata {
        let sort_labels = SortMethod::labels();

        NodeMetadata::builder(Self::ID, Self::DISPLAY_NAME)
            .description("Load all images in a directory along with their paths and names")
            .category(Category::Input)
            .version("1.0.0")
            .output(
                PortDefinition::output("images", PortType::Array(Box::new(PortType::Image)))
                    .with_display_name("IMAGES")
                    .with_description("Decoded images, each of shape (1, H, W, 3)")
                    .as_list(),
            )
            .output(
                PortDefinition::output("masks", PortType::Array(Box::new(PortType::Mask)))
                    .with_display_name("MASKS")
                    .with_description("Inverted alpha masks, zero where there is no alpha")
                    .as_list(),
            )
            .output(
                PortDefinition::output("file_paths", PortType::Array(Box::new(PortType::String)))
                    .with_display_name("FILE PATHS")
                    .with_description("Absolute path of each loaded file")
                    .as_list(),
            )
            .output(
                PortDefinition::output("file_names", PortType::Array(Box::new(PortType::String)))
                    .with_display_name("FILE NAMES")
                    .with_description("File name of each loaded file, without extension")
                    .as_list(),
            )
            .output(
                PortDefinition::output("count", PortType::Integer)
                    .with_display_name("COUNT")
                    .with_description("Number of images loaded"),
            )
            .parameter(
                ParameterDefinition::new("directory", PortType::String, Value::String(String::new()))
                    .with_description("Directory to load images from (not recursive)")
                    .with_ui_hint(UiHint::FileChooser { filters: vec![] })
                    .required(),
            )
            .parameter(
                ParameterDefinition::new("image_load_cap", PortType::Integer, Value::Integer(0))
                    .with_description("Maximum number of images to load, 0 for no limit")
                    .with_constraint(Constraint::NonNegative)
                    .with_ui_hint(UiHint::SpinBox),
            )
            .parameter(
                ParameterDefinition::new("start_index", PortType::Integer, Value::Integer(0))
                    .with_description("Entries to skip after sorting; negative keeps the last N")
                    .with_ui_hint(UiHint::SpinBox),
            )
            .parameter(
                ParameterDefinition::new("load_always", PortType::Boolean, Value::Boolean(false))
                    .with_description("Reload the directory on every run")
                    .with_ui_hint(UiHint::Checkbox {
                        label_on: "enabled".to_string(),
                        label_off: "disabled".to_string(),
                    }),
            )
            .parameter(
                ParameterDefinition::new(
                    "sort_method",
                    PortType::String,
                    Value::String(SortMethod::None.label().to_string()),
                )
                .with_description("Order applied before the start index and load cap")
                .with_constraint(Constraint::OneOf(
                    sort_labels.iter().cloned().map(Value::String).collect(),
                ))
                .with_ui_hint(UiHint::Dropdown { options: sort_labels }),
            )
            .tags(["image", "batch", "directory", "load"])
            .non_deterministic()
            .build()
    }

    fn validate(&self, ctx: &ValidationContext) -> Result<(), ValidationError> {
        for param in self.metadata().parameters {
            let value = match ctx.get_parameter(&param.name) {
                Ok(value) => value,
                Err(err) if param.required => return Err(err),
                Err(_) => continue,
            };

            param
                .validate(value)
                .map_err(|error| ValidationError::ConstraintViolation {
                    node_id: ctx.node_id,
                    parameter: param.name.clone(),
                    error,
                })?;
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), ExecutionError> {
        let options = Self::options(ctx)?;

        let batch = load_batch_with_progress(&options, |done, total| {
            ctx.set_progress(done as f32 / total as f32);
        });
        ctx.set_progress(1.0);

        let count = batch.count() as i64;
        let (images, masks, file_paths, file_names) = batch.into_parts();
        ctx.set_output(
            "images",
            Value::Array(images.into_iter().map(Value::Image).collect()),
        );
        ctx.set_output(
            "masks",
            Value::Array(masks.into_iter().map(Value::Mask).collect()),
        );
        ctx.set_output(
            "file_paths",
            Value::Array(file_paths.into_iter().map(Value::String).collect()),
        );
        ctx.set_output(
            "file_names",
            Value::Array(file_names.into_iter().map(Value::String).collect()),
        );
        ctx.set_output("count", Value::Integer(count));
        Ok(())
    }

    fn is_changed(&self, ctx: &ValidationContext) -> ChangeHint {
        match ctx.get_optional_bool("load_always") {
            Ok(Some(true)) => ChangeHint::Always,
            _ => ChangeHint::Fingerprint(fingerprint(ctx.parameters())),
        }
    }

    fn clone_box(&self) -> Box<dyn FilterNode> {
        Box::new(self.clone())
    }
}
