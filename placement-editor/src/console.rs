//! Line commands typed into the editor. Rotations are entered and shown in
//! degrees here and nowhere else.

use crate::error::ConsoleError;
use crate::result::ConsoleResult;
use indoc::indoc;
use serde_json::{json, Value};
use shared::angles::{deg_to_rad, rotation_to_degrees};
use shared::{ObjectKey, ObjectPatch, ObjectTransform};

pub const HELP: &str = indoc! {"
    Commands:
      get [object]                       show one or all transforms
      set <object> <field> <values...>   replace a field (rotation in degrees)
      set <object> <field>.<axis> <v>    replace one component, e.g. set truck position.y 0.4
      patch <object> <json>              merge a JSON object of fields
      import <object|all>                load values from the config document
      reset <object|all>                 restore the config document's values
      export <object>                    print the full document with this object's current values
      copy <object>                      same as export, onto the clipboard
      status                             main application connection status
      quit
    Objects: truck, fuelSensor, telematicsDisplay, logo
"};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    One(ObjectKey),
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Get(Option<ObjectKey>),
    Set {
        key: ObjectKey,
        field: String,
        axis: Option<String>,
        values: Vec<String>,
    },
    Patch {
        key: ObjectKey,
        json: String,
    },
    Import(Target),
    Reset(Target),
    Export(ObjectKey),
    Copy(ObjectKey),
    Status,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse(line: &str) -> ConsoleResult<Option<Command>> {
    let line = line.trim();
    let (word, rest) = match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();
    let command = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "help" | "?" => Command::Help,
        "get" | "show" => match args.next() {
            Some(object) => Command::Get(Some(object.parse()?)),
            None => Command::Get(None),
        },
        "set" => {
            let key = object_arg(args.next())?;
            let field_arg = args.next().ok_or(ConsoleError::MissingArgument("field"))?;
            let (field, axis) = match field_arg.find('.') {
                Some(i) => (&field_arg[..i], Some(field_arg[i + 1..].to_string())),
                None => (field_arg, None),
            };
            let values: Vec<String> = args.map(|s| s.trim_matches(',').to_string()).collect();
            if values.is_empty() {
                return Err(ConsoleError::MissingArgument("value"));
            }
            Command::Set {
                key,
                field: camel_case(field),
                axis,
                values,
            }
        }
        "patch" => {
            let key = object_arg(args.next())?;
            // The JSON may contain spaces, so take everything after the object name.
            let json = rest
                .splitn(2, char::is_whitespace)
                .nth(1)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(ConsoleError::MissingArgument("JSON object"))?;
            Command::Patch {
                key,
                json: json.to_string(),
            }
        }
        "import" => Command::Import(target_arg(args.next())?),
        "reset" => Command::Reset(target_arg(args.next())?),
        "export" => Command::Export(object_arg(args.next())?),
        "copy" => Command::Copy(object_arg(args.next())?),
        "status" => Command::Status,
        "quit" | "exit" => Command::Quit,
        other => return Err(ConsoleError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn object_arg(arg: Option<&str>) -> ConsoleResult<ObjectKey> {
    Ok(arg.ok_or(ConsoleError::MissingArgument("object"))?.parse()?)
}

fn target_arg(arg: Option<&str>) -> ConsoleResult<Target> {
    match arg {
        Some(all) if all.eq_ignore_ascii_case("all") => Ok(Target::All),
        other => Ok(Target::One(object_arg(other)?)),
    }
}

/// probe-length / probe_length -> probeLength
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn axis_index(axis: &str) -> ConsoleResult<usize> {
    match axis.to_lowercase().as_str() {
        "x" | "w" | "width" | "0" => Ok(0),
        "y" | "h" | "height" | "1" => Ok(1),
        "z" | "2" => Ok(2),
        _ => Err(ConsoleError::InvalidAxis(axis.to_string())),
    }
}

/// Turns a `set` command into a patch against the object's current value.
///
/// Setting a single component still produces a patch carrying the whole array,
/// so the stored array is always replaced as one value.
pub fn build_patch(
    current: &ObjectTransform,
    field: &str,
    axis: Option<&str>,
    values: &[String],
) -> ConsoleResult<ObjectPatch> {
    let key = current.key();
    let current_value = current.to_value()?;
    let existing = current_value
        .get(field)
        .ok_or_else(|| ConsoleError::UnknownField {
            key,
            field: field.to_string(),
        })?;
    let in_degrees = field == "rotation";
    let number = |text: &str| -> ConsoleResult<f64> {
        let value: f64 = text
            .parse()
            .map_err(|_| ConsoleError::InvalidNumber(text.to_string()))?;
        // JSON has no NaN or infinity; they would turn into null and vanish from the patch.
        if !value.is_finite() {
            return Err(ConsoleError::InvalidNumber(text.to_string()));
        }
        Ok(if in_degrees { deg_to_rad(value) } else { value })
    };
    let single = |values: &[String]| -> ConsoleResult<String> {
        if values.len() != 1 {
            return Err(ConsoleError::WrongArity {
                field: field.to_string(),
                expected: 1,
                got: values.len(),
            });
        }
        Ok(values[0].clone())
    };

    let new_value = match (existing, axis) {
        (Value::Array(items), Some(axis)) => {
            let index = axis_index(axis)?;
            if index >= items.len() {
                return Err(ConsoleError::InvalidAxis(axis.to_string()));
            }
            let mut array: Vec<f64> = items.iter().map(|v| v.as_f64().unwrap_or(0.0)).collect();
            array[index] = number(&single(values)?)?;
            json!(array)
        }
        (Value::Array(items), None) => {
            // Uniform scale: one value fills every component.
            if field == "scale" && values.len() == 1 {
                json!(vec![number(&values[0])?; items.len()])
            } else if values.len() != items.len() {
                return Err(ConsoleError::WrongArity {
                    field: field.to_string(),
                    expected: items.len(),
                    got: values.len(),
                });
            } else {
                let array = values
                    .iter()
                    .map(|v| number(v))
                    .collect::<ConsoleResult<Vec<f64>>>()?;
                json!(array)
            }
        }
        (_, Some(axis)) => return Err(ConsoleError::InvalidAxis(axis.to_string())),
        (Value::Bool(_), None) => {
            let text = single(values)?;
            match text.to_lowercase().as_str() {
                "true" | "on" | "yes" | "1" => json!(true),
                "false" | "off" | "no" | "0" => json!(false),
                _ => return Err(ConsoleError::InvalidBool(text)),
            }
        }
        (_, None) => json!(number(&single(values)?)?),
    };

    let mut fields = serde_json::Map::new();
    fields.insert(field.to_string(), new_value);
    Ok(ObjectPatch::from_value(key, Value::Object(fields))?)
}

/// JSON of the transform followed by its rotation in degrees.
pub fn describe(transform: &ObjectTransform) -> String {
    let json = serde_json::to_string_pretty(transform).unwrap_or_else(|e| e.to_string());
    let degrees = rotation_to_degrees(transform.rotation());
    format!(
        "{}: {}\n  rotation (deg): [{:.2}, {:.2}, {:.2}]",
        transform.key(),
        json,
        degrees[0],
        degrees[1],
        degrees[2]
    )
}
