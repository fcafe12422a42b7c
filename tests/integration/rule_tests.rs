//! Integration tests for the source-side rules
//!
//! Each test writes a small Android project to a temporary directory and runs
//! the whole pipeline over it.

use hiltlint::{Config, Diagnostic, Pipeline};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PACKAGE_DIR: &str = "app/src/main/java/com/example";

/// A temporary Android project
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn source(self, name: &str, contents: &str) -> Self {
        let dir = self.dir.path().join(PACKAGE_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), contents).unwrap();
        self
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn check(&self) -> Vec<Diagnostic> {
        check_with(self.root(), false)
    }
}

fn check_with(root: &Path, parallel: bool) -> Vec<Diagnostic> {
    let config = Config::default();
    Pipeline::new(&config)
        .with_parallel(parallel)
        .run(root)
        .unwrap()
        .diagnostics
}

fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
    diagnostics.iter().map(|d| d.message.as_str()).collect()
}

const EXAMPLE_FRAGMENT: &str = r#"package com.example

import androidx.fragment.app.Fragment
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class ExampleFragment : Fragment()
"#;

const EXAMPLE_VIEW: &str = r#"package com.example

import android.content.Context
import android.util.AttributeSet
import android.widget.FrameLayout
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class ExampleView @JvmOverloads constructor(
    context: Context,
    attr: AttributeSet? = null,
    defStyleAttr: Int = 0
) : FrameLayout(context, attr, defStyleAttr)
"#;

const EXAMPLE_VIEW_MODEL: &str = r#"package com.example

import androidx.lifecycle.ViewModel
import dagger.hilt.android.lifecycle.HiltViewModel
import javax.inject.Inject

@HiltViewModel
class ExampleViewModel @Inject constructor() : ViewModel()
"#;

const EXAMPLE_API: &str = r#"package com.example

import androidx.fragment.app.Fragment
import com.jaychang.hiltlint.RequiresAndroidEntryPoint

interface ExampleApi {
    @RequiresAndroidEntryPoint
    fun exampleFragment(): Fragment
}

class ExampleImpl : ExampleApi {
    override fun exampleFragment(): Fragment {
        return ExampleFragment()
    }
}
"#;

fn example_activity(annotated: bool) -> String {
    let annotation = if annotated { "@AndroidEntryPoint\n" } else { "" };
    format!(
        r#"package com.example

import android.os.Bundle
import androidx.activity.viewModels
import androidx.fragment.app.FragmentActivity
import dagger.hilt.android.AndroidEntryPoint
import javax.inject.Inject

{annotation}class ExampleActivity : FragmentActivity() {{
    private val viewModel by viewModels<ExampleViewModel>()

    @Inject
    lateinit var exampleApi: ExampleApi

    override fun onCreate(savedInstanceState: Bundle?) {{
        super.onCreate(savedInstanceState)

        val fragment = ExampleFragment()
        val view = ExampleView(this)
        val exampleFragment = exampleApi.exampleFragment()
    }}
}}
"#
    )
}

fn sample_project(activity_annotated: bool) -> Project {
    Project::new()
        .source("ExampleActivity.kt", &example_activity(activity_annotated))
        .source("ExampleApi.kt", EXAMPLE_API)
        .source("ExampleFragment.kt", EXAMPLE_FRAGMENT)
        .source("ExampleView.kt", EXAMPLE_VIEW)
        .source("ExampleViewModel.kt", EXAMPLE_VIEW_MODEL)
}

// ============================================================================
// Kotlin sources
// ============================================================================

#[test]
fn test_unannotated_activity_reports_every_usage() {
    let project = sample_project(false);
    let diagnostics = project.check();
    let messages = messages(&diagnostics);

    let expected = |subject: &str| {
        format!(
            "{}, com.example.ExampleActivity must be annotated with @AndroidEntryPoint.",
            subject
        )
    };
    for subject in [
        "com.example.ExampleFragment is annotated with @AndroidEntryPoint",
        "com.example.ExampleView is annotated with @AndroidEntryPoint",
        "com.example.ExampleApi.exampleFragment is annotated with @RequiresAndroidEntryPoint",
        "com.example.ExampleViewModel is annotated with @HiltViewModel",
    ] {
        let message = expected(subject);
        assert!(messages.contains(&message.as_str()), "missing {:?} in {:#?}", message, messages);
    }
    assert_eq!(diagnostics.len(), 4, "{:#?}", messages);

    assert!(diagnostics.iter().all(|d| d.issue == "RequiresAndroidEntryPoint"));
}

#[test]
fn test_annotated_activity_is_clean() {
    let project = sample_project(true);
    assert!(project.check().is_empty());
}

#[test]
fn test_factory_call_location() {
    let project = sample_project(false);
    let diagnostics = project.check();

    let factory = diagnostics
        .iter()
        .find(|d| d.message.contains("@HiltViewModel"))
        .unwrap();
    assert!(factory.location.file.ends_with("ExampleActivity.kt"));
    assert_eq!(factory.location.line, 10);
}

#[test]
fn test_plain_view_model_is_not_reported() {
    let project = Project::new()
        .source(
            "PlainViewModel.kt",
            "package com.example\n\nimport androidx.lifecycle.ViewModel\n\nclass PlainViewModel : ViewModel()\n",
        )
        .source(
            "MainActivity.kt",
            r#"package com.example

import androidx.activity.viewModels
import androidx.appcompat.app.AppCompatActivity

class MainActivity : AppCompatActivity() {
    private val viewModel by viewModels<PlainViewModel>()
}
"#,
        );

    assert!(project.check().is_empty());
}

#[test]
fn test_usage_outside_components_is_ignored() {
    let project = Project::new()
        .source("ExampleFragment.kt", EXAMPLE_FRAGMENT)
        .source(
            "Navigator.kt",
            r#"package com.example

class Navigator {
    fun open() = ExampleFragment()
}
"#,
        );

    assert!(project.check().is_empty());
}

#[test]
fn test_view_used_in_fragment() {
    let project = Project::new()
        .source("ExampleView.kt", EXAMPLE_VIEW)
        .source(
            "HomeFragment.kt",
            r#"package com.example

import androidx.fragment.app.Fragment

class HomeFragment : Fragment() {
    private var exampleView: ExampleView? = null
}
"#,
        );

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "com.example.ExampleView is annotated with @AndroidEntryPoint, \
         com.example.HomeFragment must be annotated with @AndroidEntryPoint."
    );
}

#[test]
fn test_fragment_attached_by_class_literal() {
    let project = Project::new().source("ExampleFragment.kt", EXAMPLE_FRAGMENT).source(
        "MainActivity.kt",
        r#"package com.example

import android.os.Bundle
import androidx.appcompat.app.AppCompatActivity

class MainActivity : AppCompatActivity() {
    override fun onCreate(savedInstanceState: Bundle?) {
        super.onCreate(savedInstanceState)
        supportFragmentManager.beginTransaction()
            .add(R.id.container, ExampleFragment::class.java, null)
            .commit()
    }
}
"#,
    );

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "com.example.ExampleFragment is annotated with @AndroidEntryPoint, \
         com.example.MainActivity must be annotated with @AndroidEntryPoint."
    );
    assert_eq!(diagnostics[0].location.line, 10);
}

#[test]
fn test_nested_class_host() {
    let project = Project::new()
        .source("ExampleFragment.kt", EXAMPLE_FRAGMENT)
        .source(
            "Screens.kt",
            r#"package com.example

import androidx.appcompat.app.AppCompatActivity
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class Screens : AppCompatActivity() {
    class Detail : AppCompatActivity() {
        fun show() = ExampleFragment()
    }
}
"#,
        );

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .ends_with("com.example.Screens.Detail must be annotated with @AndroidEntryPoint."));
}

// ============================================================================
// Java sources
// ============================================================================

#[test]
fn test_java_activity_instantiating_fragment() {
    let project = Project::new().source("ExampleFragment.kt", EXAMPLE_FRAGMENT).source(
        "LegacyActivity.java",
        r#"package com.example;

import androidx.appcompat.app.AppCompatActivity;

public class LegacyActivity extends AppCompatActivity {
    void show() {
        getSupportFragmentManager().beginTransaction().add(new ExampleFragment(), "example").commit();
    }
}
"#,
    );

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "com.example.ExampleFragment is annotated with @AndroidEntryPoint, \
         com.example.LegacyActivity must be annotated with @AndroidEntryPoint."
    );
    assert_eq!(diagnostics[0].location.line, 7);
}

#[test]
fn test_java_class_literal() {
    let project = Project::new().source("ExampleFragment.kt", EXAMPLE_FRAGMENT).source(
        "LegacyActivity.java",
        r#"package com.example;

import androidx.appcompat.app.AppCompatActivity;

public class LegacyActivity extends AppCompatActivity {
    void show() {
        getSupportFragmentManager().beginTransaction().add(R.id.container, ExampleFragment.class, null).commit();
    }
}
"#,
    );

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .ends_with("com.example.LegacyActivity must be annotated with @AndroidEntryPoint."));
}

// ============================================================================
// Runs
// ============================================================================

#[test]
fn test_repeated_runs_are_identical() {
    let project = sample_project(false);
    let first = project.check();
    let second = project.check();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_matches_sequential() {
    let project = sample_project(false);
    let sequential = check_with(project.root(), false);
    let parallel = check_with(project.root(), true);
    assert_eq!(sequential, parallel);
}

#[test]
fn test_fixed_project_reports_nothing_on_next_run() {
    let project = sample_project(false);
    assert_eq!(project.check().len(), 4);

    let project = project.source("ExampleActivity.kt", &example_activity(true));
    assert!(project.check().is_empty());
}

#[test]
fn test_project_checked_out_under_build_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("build/myapp");
    let dir = root.join(PACKAGE_DIR);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ExampleActivity.kt"), example_activity(false)).unwrap();
    fs::write(dir.join("ExampleFragment.kt"), EXAMPLE_FRAGMENT).unwrap();

    // Only paths below the project root are matched against `**/build/**`
    let generated = root.join("app/build/generated/source/com/example");
    fs::create_dir_all(&generated).unwrap();
    fs::write(generated.join("ExampleFragment.kt"), EXAMPLE_FRAGMENT).unwrap();

    let config = Config::default();
    let outcome = Pipeline::new(&config).run(&root).unwrap();
    assert_eq!(outcome.stats.source_files(), 2);
    assert_eq!(outcome.diagnostics.len(), 1);
}

#[test]
fn test_custom_marker_names() {
    let project = Project::new()
        .source(
            "Marked.kt",
            r#"package com.example

import com.acme.NeedsHost

@NeedsHost
class Marked
"#,
        )
        .source(
            "MainActivity.kt",
            r#"package com.example

import androidx.appcompat.app.AppCompatActivity

class MainActivity : AppCompatActivity() {
    private val marked = Marked()
}
"#,
        );

    let mut config = Config::default();
    config.hilt.requires_entry_point_annotation = "com.acme.NeedsHost".to_string();
    let diagnostics = Pipeline::new(&config).run(project.root()).unwrap().diagnostics;

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "com.example.Marked is annotated with @NeedsHost, \
         com.example.MainActivity must be annotated with @AndroidEntryPoint."
    );
}
