//! Integration tests for the layout and navigation rules
//!
//! Classes are tied to resources either through a generated binding class or
//! through `R.layout` / `R.navigation`; entry points placed in those
//! resources require the tied class to be an entry point.

use hiltlint::{Config, Diagnostic, Pipeline};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PACKAGE_DIR: &str = "app/src/main/java/com/example";
const RES_DIR: &str = "app/src/main/res";

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
        self.write(&format!("{}/{}", PACKAGE_DIR, name), contents)
    }

    fn resource(self, folder: &str, name: &str, contents: &str) -> Self {
        self.write(&format!("{}/{}/{}", RES_DIR, folder, name), contents)
    }

    fn write(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
        self
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn check(&self) -> Vec<Diagnostic> {
        let config = Config::default();
        Pipeline::new(&config).run(self.root()).unwrap().diagnostics
    }
}

const HOME_FRAGMENT: &str = r#"package com.example

import androidx.fragment.app.Fragment
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class HomeFragment : Fragment()
"#;

const LAYOUT_WITH_FRAGMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android"
    android:layout_width="match_parent"
    android:layout_height="match_parent">

    <fragment
        android:id="@+id/home"
        android:name="com.example.HomeFragment"
        android:layout_width="match_parent"
        android:layout_height="match_parent" />
</LinearLayout>
"#;

const LAYOUT_WITH_NAV_HOST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<FrameLayout xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:app="http://schemas.android.com/apk/res-auto"
    android:layout_width="match_parent"
    android:layout_height="match_parent">

    <androidx.fragment.app.FragmentContainerView
        android:id="@+id/nav_host"
        android:name="androidx.navigation.fragment.NavHostFragment"
        android:layout_width="match_parent"
        android:layout_height="match_parent"
        app:navGraph="@navigation/nav_main" />
</FrameLayout>
"#;

const NAV_MAIN: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<navigation xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:app="http://schemas.android.com/apk/res-auto"
    android:id="@+id/nav_main"
    app:startDestination="@id/home">

    <fragment
        android:id="@+id/home"
        android:name="com.example.HomeFragment" />
</navigation>
"#;

fn binding_activity(name: &str, annotated: bool) -> String {
    let annotation = if annotated { "@AndroidEntryPoint\n" } else { "" };
    format!(
        r#"package com.example

import android.os.Bundle
import androidx.appcompat.app.AppCompatActivity
import com.example.databinding.ActivityMainBinding
import dagger.hilt.android.AndroidEntryPoint

{annotation}class {name} : AppCompatActivity() {{
    private lateinit var binding: ActivityMainBinding

    override fun onCreate(savedInstanceState: Bundle?) {{
        super.onCreate(savedInstanceState)
        binding = ActivityMainBinding.inflate(layoutInflater)
        setContentView(binding.root)
    }}
}}
"#
    )
}

fn content_view_activity(name: &str, annotated: bool) -> String {
    let annotation = if annotated { "@AndroidEntryPoint\n" } else { "" };
    format!(
        r#"package com.example

import android.os.Bundle
import androidx.appcompat.app.AppCompatActivity
import dagger.hilt.android.AndroidEntryPoint

{annotation}class {name} : AppCompatActivity() {{
    override fun onCreate(savedInstanceState: Bundle?) {{
        super.onCreate(savedInstanceState)
        setContentView(R.layout.activity_main)
    }}
}}
"#
    )
}

// ============================================================================
// Layouts
// ============================================================================

#[test]
fn test_entry_point_fragment_in_binding_layout() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &binding_activity("MainActivity", false))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message,
        "com.example.HomeFragment is annotated with @AndroidEntryPoint, \
         com.example.MainActivity must be annotated with @AndroidEntryPoint."
    );
    assert!(diagnostic.location.file.ends_with("res/layout/activity_main.xml"));
    assert_eq!(diagnostic.location.line, 6);
    assert_eq!(diagnostic.location.column, 5);
}

#[test]
fn test_entry_point_fragment_in_content_view_layout() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    assert_eq!(project.check().len(), 1);
}

#[test]
fn test_annotated_host_layout_is_clean() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &binding_activity("MainActivity", true))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    assert!(project.check().is_empty());
}

#[test]
fn test_unreferenced_layout_is_ignored() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource("layout", "activity_other.xml", LAYOUT_WITH_FRAGMENT);

    assert!(project.check().is_empty());
}

#[test]
fn test_plain_fragment_in_layout_is_ignored() {
    let project = Project::new()
        .source(
            "HomeFragment.kt",
            "package com.example\n\nimport androidx.fragment.app.Fragment\n\nclass HomeFragment : Fragment()\n",
        )
        .source("MainActivity.kt", &binding_activity("MainActivity", false))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    assert!(project.check().is_empty());
}

#[test]
fn test_framework_widget_shadowed_by_project_class() {
    let project = Project::new()
        .write(
            "app/src/main/java/com/example/ui/Button.kt",
            r#"package com.example.ui

import android.content.Context
import android.widget.FrameLayout
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class Button(context: Context) : FrameLayout(context)
"#,
        )
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource(
            "layout",
            "activity_main.xml",
            r#"<LinearLayout xmlns:android="http://schemas.android.com/apk/res/android">
    <Button android:id="@+id/ok" />
</LinearLayout>
"#,
        );

    assert!(project.check().is_empty());
}

#[test]
fn test_layout_qualifier_folders() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &binding_activity("MainActivity", false))
        .resource("layout-land", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    assert_eq!(project.check().len(), 1);
}

// ============================================================================
// Direct references win over binding guesses
// ============================================================================

#[test]
fn test_direct_reference_replaces_binding_guess() {
    // Both activities tie themselves to activity_main; only the direct
    // reference from `ContentActivity` counts
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("BindingActivity.kt", &binding_activity("BindingActivity", true))
        .source("ContentActivity.kt", &content_view_activity("ContentActivity", false))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0]
        .message
        .ends_with("com.example.ContentActivity must be annotated with @AndroidEntryPoint."));
}

#[test]
fn test_binding_guess_never_replaces_direct_reference() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("BindingActivity.kt", &binding_activity("BindingActivity", false))
        .source("ContentActivity.kt", &content_view_activity("ContentActivity", true))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_FRAGMENT);

    assert!(project.check().is_empty());
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_destination_through_nav_host_layout() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_NAV_HOST)
        .resource("navigation", "nav_main.xml", NAV_MAIN);

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);

    let diagnostic = &diagnostics[0];
    assert_eq!(
        diagnostic.message,
        "com.example.HomeFragment is annotated with @AndroidEntryPoint, \
         com.example.MainActivity must be annotated with @AndroidEntryPoint."
    );
    assert!(diagnostic.location.file.ends_with("res/navigation/nav_main.xml"));
    assert_eq!(diagnostic.location.line, 7);
}

#[test]
fn test_destination_of_graph_set_from_code() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source(
            "MainActivity.kt",
            r#"package com.example

import android.os.Bundle
import androidx.appcompat.app.AppCompatActivity
import androidx.navigation.findNavController

class MainActivity : AppCompatActivity() {
    override fun onCreate(savedInstanceState: Bundle?) {
        super.onCreate(savedInstanceState)
        findNavController(R.id.nav_host).setGraph(R.navigation.nav_main)
    }
}
"#,
        )
        .resource("navigation", "nav_main.xml", NAV_MAIN);

    let diagnostics = project.check();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].location.file.ends_with("nav_main.xml"));
}

#[test]
fn test_annotated_nav_host_is_clean() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", true))
        .resource("layout", "activity_main.xml", LAYOUT_WITH_NAV_HOST)
        .resource("navigation", "nav_main.xml", NAV_MAIN);

    assert!(project.check().is_empty());
}

#[test]
fn test_unhosted_navigation_graph_is_ignored() {
    let layout = LAYOUT_WITH_FRAGMENT.replace("HomeFragment", "OtherFragment");
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource("layout", "activity_main.xml", &layout)
        .resource("navigation", "nav_other.xml", NAV_MAIN);

    assert!(project.check().is_empty());
}

// ============================================================================
// Other resource folders
// ============================================================================

#[test]
fn test_menu_and_values_are_not_collected() {
    let project = Project::new()
        .source("HomeFragment.kt", HOME_FRAGMENT)
        .source("MainActivity.kt", &content_view_activity("MainActivity", false))
        .resource(
            "menu",
            "activity_main.xml",
            r#"<menu xmlns:android="http://schemas.android.com/apk/res/android">
    <item android:id="@+id/home" android:title="@string/home" />
</menu>
"#,
        )
        .resource("values", "strings.xml", "<resources>\n    <string name=\"home\">Home</string>\n</resources>\n");

    assert!(project.check().is_empty());
}
