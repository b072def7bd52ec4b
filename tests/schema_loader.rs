use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use sprinkles_prefer::{
    Clock, Linter, Primitive, PropertyValue, RuleOptions, SchemaError, SchemaFallback,
    SchemaLoader,
};

struct ManualClock(Mutex<Instant>);

impl ManualClock {
    fn new() -> Self {
        Self(Mutex::new(Instant::now()))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.0.lock().unwrap()
    }
}

const SPRINKLES: &str = "
import { defineProperties, createSprinkles } from '@vanilla-extract/sprinkles';

const colors = { 'gray-100': '#f7fafc', 'blue-500': '#4299e1' };

const layout = defineProperties({
  properties: {
    display: ['none', 'flex', 'block'],
    width: ['100%', 'auto'],
    color: colors,
  },
});

export const sprinkles = createSprinkles(layout);
";

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn options(root: &Path) -> RuleOptions {
    RuleOptions {
        project_root: Some(root.to_path_buf()),
        ..RuleOptions::default()
    }
}

fn str_value(s: &str) -> PropertyValue {
    PropertyValue::Literal(Primitive::Str(s.into()))
}

#[test]
fn loads_schema_from_project() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/styles/sprinkles.css.ts", SPRINKLES);

    let loader = SchemaLoader::new(options(dir.path()));
    assert!(loader.is_known_property("display"));
    assert!(!loader.is_known_property("gap"));
    assert!(loader.is_allowed_value("width", &str_value("100%")));
    assert!(!loader.is_allowed_value("width", &str_value("50%")));
    assert!(loader.is_allowed_value("color", &str_value("gray-100")));
    assert!(!loader.is_allowed_value("color", &str_value("red")));
}

#[test]
fn cached_until_expiry() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/styles/sprinkles.css.ts", SPRINKLES);

    let clock = Arc::new(ManualClock::new());
    let loader = SchemaLoader::with_clock(options(dir.path()), clock.clone());
    let first = loader.schema();
    assert!(first.is_known_property("display"));

    write(
        dir.path(),
        "src/styles/sprinkles.css.ts",
        "defineProperties({ properties: { gap: [0, 4] } });",
    );
    clock.advance(Duration::from_secs(30));
    assert!(Arc::ptr_eq(&first, &loader.schema()));

    clock.advance(Duration::from_secs(31));
    let reloaded = loader.schema();
    assert!(reloaded.is_known_property("gap"));
    assert!(!reloaded.is_known_property("display"));
}

#[test]
fn invalidate_forces_reload() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "sprinkles.css.ts", SPRINKLES);

    let clock = Arc::new(ManualClock::new());
    let loader = SchemaLoader::with_clock(options(dir.path()), clock);
    assert_eq!(loader.schema().len(), 3);

    write(dir.path(), "sprinkles.css.ts", "defineProperties({ properties: {} });");
    assert_eq!(loader.schema().len(), 3);
    loader.invalidate();
    assert!(loader.schema().is_empty());
}

#[test]
fn missing_schema_file_means_no_reports() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/button.css.ts", "style({ width: '100%' });");

    let loader = SchemaLoader::new(options(dir.path()));
    assert!(matches!(
        loader.read_schema(dir.path()),
        Err(SchemaError::NotFound { .. })
    ));
    assert!(loader.schema().is_empty());

    let linter = Linter::new(options(dir.path()));
    assert!(linter.lint("button.css.ts", "style({ width: '100%' });").unwrap().is_empty());
}

#[test]
fn unparsable_schema_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/styles/sprinkles.css.ts", "defineProperties({ properties: {");

    let loader = SchemaLoader::new(options(dir.path()));
    assert!(matches!(
        loader.read_schema(dir.path()),
        Err(SchemaError::Parse { .. })
    ));
    assert!(loader.schema().is_empty());
}

#[test]
fn builtin_fallback_when_configured() {
    let dir = tempfile::tempdir().unwrap();
    let opts = RuleOptions {
        fallback: SchemaFallback::Builtin,
        ..options(dir.path())
    };
    let loader = SchemaLoader::new(opts);
    assert!(loader.is_known_property("display"));
    assert!(loader.is_allowed_value("color", &str_value("gray-100")));
}

#[test]
fn node_modules_copies_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "node_modules/ui/styles/sprinkles.css.ts", SPRINKLES);

    let loader = SchemaLoader::new(options(dir.path()));
    assert!(loader.schema().is_empty());
}

#[test]
fn linter_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/styles/sprinkles.css.ts", SPRINKLES);
    let json = serde_json::json!({ "projectRoot": dir.path() }).to_string();

    let linter = Linter::from_json_options(&json);
    let src = "export const card = style({ display: 'flex', color: 'blue-500', padding: 8 });";
    let diagnostics = linter.lint("card.css.ts", src).unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].properties, ["display", "color"]);

    let fixed = linter.fix("card.css.ts", src).unwrap();
    assert_eq!(
        fixed,
        "export const card = style([sprinkles({\n  display: 'flex',\n  color: 'blue-500'\n}), {\n  padding: 8\n}]);"
    );

    let reports = linter.report("card.css.ts", src).unwrap();
    assert_eq!((reports[0].line, reports[0].column), (1, 21));
}
