use std::fs;
use std::path::PathBuf;

use adnauseam_core::{Action, TemplateBinding};
use adnauseam_renderer::RenderError;
use adnauseam_sync::{env, RenderPipeline, SyncError, WriteResult};
use tempfile::TempDir;

fn binding(dir: &TempDir, name: &str, text: &str) -> TemplateBinding {
    let template = dir.path().join(format!("{name}.template"));
    fs::write(&template, text).expect("write template");
    TemplateBinding {
        template,
        output: dir.path().join("out").join(format!("{name}.conf")),
    }
}

#[test]
fn shared_key_updates_both_contexts_but_only_complete_template_renders() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().unwrap();
    let web = binding(&dir, "web", "upstream {db/host}:{db/port}\n");
    let worker = binding(&dir, "worker", "DB={db/host} QUEUE={queue/url}\n");

    let pipeline = RenderPipeline::load(&[web.clone(), worker.clone()]).expect("load");
    assert_eq!(pipeline.len(), 2);
    assert_eq!(
        pipeline.index().keys().collect::<Vec<_>>(),
        vec!["db/host", "db/port", "queue/url"]
    );
    assert_eq!(pipeline.index().contexts("db/host").len(), 2);

    let index = pipeline.index();
    assert!(index.collect(&Action::Set, "db/port", Some("5432"), 3));
    assert!(index.collect(&Action::Set, "db/host", Some("10.0.0.7"), 4));

    for binding in pipeline.bindings() {
        assert_eq!(binding.context().get("db/host"), Some("10.0.0.7"));
    }

    let round = pipeline.render().expect("render");
    assert_eq!(round.rendered(), vec![web.output.as_path()]);
    assert_eq!(round.total(), 2);
    assert!(!round.is_complete(), "1 of 2 rendered must not be complete");
    assert_eq!(fs::read_to_string(&web.output).unwrap(), "upstream 10.0.0.7:5432\n");
    assert!(!worker.output.exists());

    assert!(index.collect(&Action::Set, "queue/url", Some("amqp://q"), 5));
    let round = pipeline.render().expect("render");
    assert!(round.is_complete());
    assert_eq!(fs::read_to_string(&worker.output).unwrap(), "DB=10.0.0.7 QUEUE=amqp://q\n");
}

#[test]
fn deleting_a_dependency_removes_the_output() {
    let dir = TempDir::new().unwrap();
    let greeting = binding(&dir, "greeting", "Hi {name}!");
    let pipeline = RenderPipeline::load(&[greeting.clone()]).expect("load");

    pipeline.index().collect(&Action::Set, "name", Some("Bob"), 1);
    pipeline.render().expect("render");
    assert_eq!(fs::read_to_string(&greeting.output).unwrap(), "Hi Bob!");

    pipeline.index().collect(&Action::Remove, "name", None, 2);
    let round = pipeline.render().expect("render");
    assert_eq!(round.writes, vec![WriteResult::Removed { path: greeting.output.clone() }]);
    assert!(!greeting.output.exists());
}

#[test]
fn environment_keys_feed_templates() {
    let dir = TempDir::new().unwrap();
    let b = binding(&dir, "envy", "home={env/APP_HOME}");
    let pipeline = RenderPipeline::load(&[b.clone()]).expect("load");

    let consumed = env::seed_from(
        pipeline.index(),
        [("APP_HOME".to_string(), "/srv/app".to_string())],
    );
    assert_eq!(consumed, 1);

    pipeline.render().expect("render");
    assert_eq!(fs::read_to_string(&b.output).unwrap(), "home=/srv/app");
}

#[test]
fn unterminated_template_fails_load_with_path() {
    let dir = TempDir::new().unwrap();
    let good = binding(&dir, "good", "{a}");
    let bad = binding(&dir, "bad", "{a} {b");

    let err = RenderPipeline::load(&[good, bad.clone()]).unwrap_err();
    assert!(
        matches!(
            &err,
            SyncError::Render(RenderError::UnterminatedPlaceholder { path, .. })
                if *path == bad.template
        ),
        "got: {err}"
    );
}

#[test]
fn missing_template_file_fails_load() {
    let b = TemplateBinding {
        template: PathBuf::from("/definitely/not/here.template"),
        output: PathBuf::from("/tmp/unused.conf"),
    };
    let err = RenderPipeline::load(&[b]).unwrap_err();
    assert!(matches!(err, SyncError::Render(RenderError::Io { .. })), "got: {err}");
}

#[test]
fn same_template_may_feed_several_outputs() {
    let dir = TempDir::new().unwrap();
    let first = binding(&dir, "shared", "v={k}");
    let second = TemplateBinding {
        template: first.template.clone(),
        output: dir.path().join("copy.conf"),
    };
    let pipeline = RenderPipeline::load(&[first.clone(), second.clone()]).expect("load");
    pipeline.index().collect(&Action::Set, "k", Some("1"), 1);

    let round = pipeline.render().expect("render");
    assert!(round.is_complete());
    assert_eq!(fs::read_to_string(&first.output).unwrap(), "v=1");
    assert_eq!(fs::read_to_string(&second.output).unwrap(), "v=1");
}
