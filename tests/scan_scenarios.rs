//! End-to-end scan scenarios over synthetic classpaths built with the in-crate class file
//! encoder (no JDK required).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use jvmscan::classpath::Root;
use jvmscan::config::ScanConfig;
use jvmscan::filter::{Filter, FilterShape};
use jvmscan::jvm::access_flags::ClassAccessFlags;
use jvmscan::jvm::parsing::encode::ClassFileBuilder;
use jvmscan::Diagnostic;

fn scratch_dir() -> PathBuf {
    static NONCE: AtomicU64 = AtomicU64::new(0);
    let dir = std::env::temp_dir().join(format!(
        "jvmscan-scenario-{}-{}",
        std::process::id(),
        NONCE.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_class(root: &Path, internal_name: &str, bytes: Vec<u8>) {
    let path = root.join(format!("{internal_name}.class"));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

#[test]
fn recovers_a_small_hierarchy() {
    let root = scratch_dir();
    write_class(
        &root,
        "a/Animal",
        ClassFileBuilder::new("a/Animal")
            .access_flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::ABSTRACT)
            .super_name("java/lang/Object")
            .build(),
    );
    write_class(
        &root,
        "a/Dog",
        ClassFileBuilder::new("a/Dog")
            .access_flags(ClassAccessFlags::PUBLIC)
            .super_name("a/Animal")
            .interface("a/Pet")
            .build(),
    );
    write_class(
        &root,
        "a/Pet",
        ClassFileBuilder::new("a/Pet")
            .access_flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT)
            .build(),
    );

    let config = ScanConfig::new().add_root(Root::Directory(root.clone()));
    let scan = jvmscan::scan(&config).unwrap();

    assert!(scan.diagnostics().is_empty());
    assert_eq!(scan.superclasses_of("a.Dog").unwrap(), vec!["a.Animal".to_owned(), "java.lang.Object".to_owned()]);
    assert_eq!(scan.subclasses_of("a.Animal").unwrap(), vec!["a.Dog".to_owned()]);
    assert_eq!(scan.implementations_of("a.Pet").unwrap(), vec!["a.Dog".to_owned()]);
    assert!(scan.interfaces_of("a.Dog").contains(&"a.Pet".to_owned()));

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn earliest_root_wins_across_two_directories() {
    let first = scratch_dir();
    let second = scratch_dir();
    write_class(
        &first,
        "a/Widget",
        ClassFileBuilder::new("a/Widget").access_flags(ClassAccessFlags::PUBLIC).build(),
    );
    write_class(
        &second,
        "a/Widget",
        ClassFileBuilder::new("a/Widget")
            .access_flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::FINAL)
            .build(),
    );

    let config = ScanConfig::new()
        .add_root(Root::Directory(first.clone()))
        .add_root(Root::Directory(second.clone()));
    let scan = jvmscan::scan(&config).unwrap();

    let kept = scan.class("a.Widget").unwrap();
    assert!(!kept.access_flags.contains(ClassAccessFlags::FINAL));
    assert_eq!(scan.diagnostics().len(), 1);
    assert!(matches!(scan.diagnostics()[0], Diagnostic::ShadowSkip { kept_root_index: 0, dropped_root_index: 1, .. }));

    std::fs::remove_dir_all(&first).ok();
    std::fs::remove_dir_all(&second).ok();
}

#[test]
fn filter_restricts_the_scanned_package() {
    let root = scratch_dir();
    write_class(&root, "keep/Widget", ClassFileBuilder::new("keep/Widget").build());
    write_class(&root, "skip/Other", ClassFileBuilder::new("skip/Other").build());

    let filter = Filter::new().accept("keep.", FilterShape::Prefix).unwrap();
    let config = ScanConfig::new().add_root(Root::Directory(root.clone())).name_filter(filter);
    let scan = jvmscan::scan(&config).unwrap();

    let names: Vec<_> = scan.class_names().collect();
    assert_eq!(names, vec!["keep.Widget"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn field_and_method_info_are_absent_unless_enabled() {
    let root = scratch_dir();
    write_class(
        &root,
        "a/Widget",
        ClassFileBuilder::new("a/Widget")
            .field("count", "I", jvmscan::jvm::access_flags::FieldAccessFlags::PRIVATE)
            .build(),
    );

    let without_fields = jvmscan::scan(&ScanConfig::new().add_root(Root::Directory(root.clone()))).unwrap();
    assert!(without_fields.class("a.Widget").unwrap().fields.is_none());

    let with_fields = jvmscan::scan(
        &ScanConfig::new()
            .add_root(Root::Directory(root.clone()))
            .enable_field_info(true),
    )
    .unwrap();
    assert_eq!(with_fields.class("a.Widget").unwrap().fields.as_ref().unwrap().len(), 1);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn querying_a_class_as_an_interface_is_a_usage_error() {
    let root = scratch_dir();
    write_class(&root, "a/Widget", ClassFileBuilder::new("a/Widget").build());
    let scan = jvmscan::scan(&ScanConfig::new().add_root(Root::Directory(root.clone()))).unwrap();

    assert!(scan.superinterfaces_of("a.Widget").is_err());
    assert!(scan.superclasses_of("a.Widget").is_ok());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn unknown_name_is_an_empty_result_not_an_error() {
    let root = scratch_dir();
    write_class(&root, "a/Widget", ClassFileBuilder::new("a/Widget").build());
    let scan = jvmscan::scan(&ScanConfig::new().add_root(Root::Directory(root.clone()))).unwrap();

    assert_eq!(scan.superclasses_of("a.NeverSeen").unwrap(), Vec::<String>::new());
    assert_eq!(scan.annotated_with("a.NeverSeen"), Vec::<String>::new());

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn buffer_root_scans_a_single_in_memory_class() {
    let bytes = ClassFileBuilder::new("a/Widget").access_flags(ClassAccessFlags::PUBLIC).build();
    let config = ScanConfig::new().add_root(Root::Buffer(bytes, "a/Widget.class".to_owned()));
    let scan = jvmscan::scan(&config).unwrap();

    assert!(scan.diagnostics().is_empty());
    assert_eq!(scan.class_names().collect::<Vec<_>>(), vec!["a.Widget"]);
}

#[test]
fn path_filter_prunes_a_rejected_subtree() {
    let root = scratch_dir();
    write_class(&root, "com/keep/Widget", ClassFileBuilder::new("com/keep/Widget").build());
    write_class(&root, "com/internal/Secret", ClassFileBuilder::new("com/internal/Secret").build());

    let path_filter = Filter::new().reject_path("com/internal", FilterShape::Prefix).unwrap();
    let config = ScanConfig::new().add_root(Root::Directory(root.clone())).path_filter(path_filter);
    let scan = jvmscan::scan(&config).unwrap();

    assert_eq!(scan.class_names().collect::<Vec<_>>(), vec!["com.keep.Widget"]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn resource_match_callback_fires_for_matching_paths() {
    let root = scratch_dir();
    write_class(&root, "a/Widget", ClassFileBuilder::new("a/Widget").build());
    let resource_path = root.join("tpl").join("a.html");
    std::fs::create_dir_all(resource_path.parent().unwrap()).unwrap();
    std::fs::write(&resource_path, b"<html></html>").unwrap();
    let other_path = root.join("tpl").join("a.txt");
    std::fs::write(&other_path, b"not html").unwrap();

    let seen: std::sync::Arc<std::sync::Mutex<Vec<String>>> = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let seen_for_callback = seen.clone();
    let config = ScanConfig::new()
        .add_root(Root::Directory(root.clone()))
        .on_resource_match(r"^tpl/.*\.html$", move |path, _bytes| {
            seen_for_callback.lock().unwrap().push(path.to_owned());
        })
        .unwrap();
    let scan = jvmscan::scan(&config).unwrap();

    assert_eq!(scan.class_names().collect::<Vec<_>>(), vec!["a.Widget"]);
    assert_eq!(seen.lock().unwrap().as_slice(), &["tpl/a.html".to_owned()]);

    std::fs::remove_dir_all(&root).ok();
}

#[test]
fn enclosing_method_and_inner_classes_survive_a_full_scan() {
    let root = scratch_dir();
    write_class(
        &root,
        "a/Outer$1",
        ClassFileBuilder::new("a/Outer$1")
            .enclosing_method("a/Outer", Some(("run".to_owned(), "()V".to_owned())))
            .build(),
    );
    write_class(
        &root,
        "a/Outer",
        ClassFileBuilder::new("a/Outer")
            .inner_class(
                "a/Outer$1",
                Some("a/Outer".to_owned()),
                None,
                jvmscan::jvm::access_flags::NestedClassAccessFlags::PRIVATE,
            )
            .build(),
    );

    let scan = jvmscan::scan(&ScanConfig::new().add_root(Root::Directory(root.clone()))).unwrap();

    let anonymous = scan.class("a.Outer$1").unwrap();
    let enclosing = anonymous.enclosing_method.as_ref().unwrap();
    assert_eq!(enclosing.class_name, "a.Outer");
    assert_eq!(enclosing.method_name.as_deref(), Some("run"));

    let outer = scan.class("a.Outer").unwrap();
    assert_eq!(outer.inner_classes.len(), 1);
    assert_eq!(outer.inner_classes[0].inner_name, "a.Outer$1");

    std::fs::remove_dir_all(&root).ok();
}
