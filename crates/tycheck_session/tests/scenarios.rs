//! End-to-end checks of a session over a small project on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tycheck_overlay::RawEdit;
use tycheck_session::{DiagnosticsReport, Session};

const MAIN: &str = "import App from './App';\nimport './index.css';\n\nexport default function Root() {\n  return <App />;\n}\n";
const APP: &str = "export default function App() {\n  return <div>Hello World</div>;\n}\n";

fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

/// A clean project: an entry point importing a valid `App` component.
fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "src/main.tsx", MAIN);
    write(dir.path(), "src/App.tsx", APP);
    dir
}

fn diagnostics(report: DiagnosticsReport) -> String {
    report.diagnostics.expect("expected diagnostics")
}

#[test]
fn empty_batches_on_a_clean_project_stay_clean() {
    let dir = project();
    let mut session = Session::new(dir.path());
    assert_eq!(session.check(&[]).unwrap().diagnostics, None);
    assert_eq!(session.check(&[]).unwrap().diagnostics, None);
}

#[test]
fn creating_a_valid_component() {
    let dir = project();
    write(dir.path(), "src/main.tsx", "import A from './A';\nexport default A;\n");
    let mut session = Session::new(dir.path());

    let missing = diagnostics(session.check(&[]).unwrap());
    assert!(missing.contains("error TS2307: Cannot find module './A'"));

    let report = session
        .check(&[RawEdit::create(
            "src/A.tsx",
            "export default function A(){ return <div>Hi</div> }",
        )])
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn malformed_jsx_closing_tag() {
    let dir = project();
    write(dir.path(), "src/main.tsx", "import A from './A';\nexport default A;\n");
    let mut session = Session::new(dir.path());
    let text = diagnostics(
        session
            .check(&[RawEdit::create(
                "src/A.tsx",
                "export default function A(){ return <div>Hi</div\n}",
            )])
            .unwrap(),
    );
    assert!(
        text.starts_with("src/A.tsx:2:1 - error TS1005: '>' expected.\n"),
        "{text}"
    );
}

#[test]
fn syntax_error_round_trip() {
    let dir = project();
    let mut session = Session::new(dir.path());
    let broken = "\n        export default function App() { \n          return <div>Hello World</div \n        }\n      ";

    let text = diagnostics(session.check(&[RawEdit::create("src/App.tsx", broken)]).unwrap());
    assert_eq!(
        text,
        "src/App.tsx:4:9 - error TS1005: '>' expected.\n\n4         }\n          ~\n"
    );

    let report = session.check(&[RawEdit::update("src/App.tsx", APP)]).unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn unterminated_closing_tag_before_a_semicolon() {
    let dir = project();
    let mut session = Session::new(dir.path());
    let text = diagnostics(
        session
            .check(&[RawEdit::create(
                "src/components/Broken.tsx",
                "\n        export default function Broken() {\n          return <div>Missing closing tag</div;\n        }\n      ",
            )])
            .unwrap(),
    );
    assert_eq!(
        text,
        "src/components/Broken.tsx:3:47 - error TS1005: '>' expected.\n\n3           return <div>Missing closing tag</div;\n                                                ~\n"
    );
}

#[test]
fn css_module_declarations_allow_default_imports() {
    let dir = project();
    let mut session = Session::new(dir.path());
    let report = session
        .check(&[
            RawEdit::create(
                "src/components/Styled.module.css.d.ts",
                "export const container: string;\nexport const title: string;\n",
            ),
            RawEdit::create(
                "src/components/Styled.tsx",
                "import styles from './Styled.module.css';\n\nexport default function Styled() {\n  return <div className={styles.container}>Hi</div>;\n}\n",
            ),
            RawEdit::update(
                "src/App.tsx",
                "import Styled from './components/Styled';\nexport default function App() {\n  return <Styled />;\n}\n",
            ),
        ])
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn fifty_file_import_chain() {
    let dir = project();
    let mut edits: Vec<RawEdit> = (0..50)
        .map(|i| {
            let content = if i == 49 {
                "export const v49 = 0;\n".to_string()
            } else {
                format!(
                    "import {{ v{next} }} from './c{next}';\nexport const v{i} = v{next} + 1;\n",
                    next = i + 1
                )
            };
            RawEdit::create(format!("src/chain/c{i}.ts"), content)
        })
        .collect();
    edits.push(RawEdit::update(
        "src/App.tsx",
        "import { v0 } from './chain/c0';\nexport default function App() {\n  return <div>{v0}</div>;\n}\n",
    ));

    let mut session = Session::new(dir.path());
    let report = session.check(&edits).unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);

    let broken = session
        .check(&[RawEdit::update("src/chain/c49.ts", "export const other = 0;\n")])
        .unwrap();
    let text = diagnostics(broken);
    assert!(text.contains("src/chain/c48.ts:1:10 - error TS2305"), "{text}");
}

#[test]
fn move_matches_delete_then_create() {
    let dir = project();
    write(dir.path(), "src/main.tsx", "import B from './B';\nexport default B;\n");
    write(dir.path(), "src/A.tsx", "export default 1;\n");
    write(dir.path(), "src/uses-a.ts", "import A from './A';\nexport const a = A;\n");

    let content = "export default function B() { return null; }\n";
    let mut moved = Session::new(dir.path());
    let via_move = moved
        .check(&[RawEdit::move_to("src/A.tsx", "src/B.tsx", content)])
        .unwrap();

    let mut replaced = Session::new(dir.path());
    let via_edits = replaced
        .check(&[
            RawEdit::delete("src/A.tsx"),
            RawEdit::create("src/B.tsx", content),
        ])
        .unwrap();

    assert_eq!(via_move, via_edits);
    let text = diagnostics(via_move);
    assert!(text.contains("src/uses-a.ts"));
    assert!(text.contains("Cannot find module './A'"));
    assert!(!text.contains("'./B'"));
}

#[test]
fn deleting_an_unknown_path_is_idempotent() {
    let dir = project();
    let mut session = Session::new(dir.path());
    let edits = [RawEdit::delete("src/never-existed.ts")];
    assert!(session.check(&edits).unwrap().is_clean());
    assert!(session.check(&edits).unwrap().is_clean());
    assert!(session
        .overlay()
        .is_deleted(&dir.path().join("src/never-existed.ts")));
}

#[test]
fn deleting_a_disk_file_hides_it_until_recreated() {
    let dir = project();
    let mut session = Session::new(dir.path());

    let text = diagnostics(session.check(&[RawEdit::delete("src/App.tsx")]).unwrap());
    assert!(text.contains("src/main.tsx:1:17 - error TS2307"), "{text}");

    let report = session
        .check(&[RawEdit::create(
            "src/App.tsx",
            "export default function App() { return <p>again</p>; }\n",
        )])
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn internal_files_are_never_reported() {
    let dir = project();
    write(dir.path(), "src/__internal__/broken.ts", "export const = ;\n");
    let mut session = Session::new(dir.path());
    assert!(session.check(&[]).unwrap().is_clean());

    let report = session
        .check(&[RawEdit::create(
            "src/__internal__/also-broken.tsx",
            "export default () => <div></span>;\n",
        )])
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn internal_paths_are_aliased_only_outside_snippets() {
    let dir = project();
    write(dir.path(), "src/__internal__/sdk.ts", "export const x = 1;\n");
    let mut session = Session::new(dir.path());
    let text = diagnostics(
        session
            .check(&[RawEdit::update(
                "src/App.tsx",
                "import { y } from '../src/__internal__/sdk';\nexport default function App() { return <div>{y}</div>; }\n",
            )])
            .unwrap(),
    );
    assert!(
        text.starts_with(
            "src/App.tsx:1:10 - error TS2305: Module '\"../@internal/sdk\"' has no exported member 'y'.\n"
        ),
        "{text}"
    );
    assert!(
        text.contains("\n1 import { y } from '../src/__internal__/sdk';\n           ~\n"),
        "{text}"
    );
}

#[test]
fn deny_listed_messages_are_dropped() {
    let dir = project();
    write(
        dir.path(),
        "tycheck.toml",
        "[diagnostics]\nignore_messages = [\"legacy-widgets\"]\n",
    );
    let mut session = Session::new(dir.path());
    let report = session
        .check(&[RawEdit::create(
            "src/widgets.ts",
            "import 'legacy-widgets';\nimport 'other-missing';\n",
        )])
        .unwrap();
    let text = diagnostics(report);
    assert!(!text.contains("legacy-widgets"));
    assert!(text.contains("Cannot find module 'other-missing'"));
}

#[test]
fn directories_that_exist_only_in_the_overlay() {
    let dir = project();
    let mut session = Session::new(dir.path());
    let report = session
        .check(&[
            RawEdit::create("src/widgets/index.ts", "export const Widget = 1;\n"),
            RawEdit::update(
                "src/App.tsx",
                "import { Widget } from './widgets';\nexport default function App() { return <b>{Widget}</b>; }\n",
            ),
        ])
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.diagnostics);
}

#[test]
fn importers_are_rechecked_when_exports_change() {
    let dir = project();
    let mut session = Session::new(dir.path());
    assert!(session.check(&[]).unwrap().is_clean());

    let text = diagnostics(
        session
            .check(&[RawEdit::update("src/App.tsx", "export const App = 1;\n")])
            .unwrap(),
    );
    assert!(
        text.contains("src/main.tsx:1:8 - error TS1192: Module '\"./App\"' has no default export."),
        "{text}"
    );
}

#[test]
fn wire_format_edits() {
    let dir = project();
    let edits: Vec<RawEdit> = serde_json::from_str(
        r#"[{"type": "create", "filePath": "src/Note.tsx", "content": "export default 1;\n"},
            {"type": "move", "path": "src/Note.tsx", "newFilePath": "src/Memo.tsx", "content": "export default 2;\n"}]"#,
    )
    .unwrap();
    let mut session = Session::new(dir.path());
    assert!(session.check(&edits).unwrap().is_clean());
    assert!(session.overlay().is_deleted(&dir.path().join("src/Note.tsx")));
}

#[test]
fn build_cache_is_persisted_between_sessions() {
    let dir = project();
    {
        let mut session = Session::new(dir.path());
        assert!(session.check(&[]).unwrap().is_clean());
    }
    assert!(dir.path().join(".tycheck/buildinfo.bin").is_file());

    let mut session = Session::new(dir.path());
    assert!(session.check(&[]).unwrap().is_clean());
}
