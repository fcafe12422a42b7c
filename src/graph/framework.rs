//! Android framework and AndroidX classes the project does not declare itself.
//!
//! Project sources only tell us `class MainActivity : AppCompatActivity()`;
//! deciding that this is an activity needs the library side of the hierarchy.
//! The table below covers the component, view and binding classes Hilt cares about.

pub const CLASS_APPLICATION: &str = "android.app.Application";
pub const CLASS_ACTIVITY: &str = "androidx.activity.ComponentActivity";
pub const CLASS_FRAGMENT: &str = "androidx.fragment.app.Fragment";
pub const CLASS_VIEW: &str = "android.view.View";
pub const CLASS_VIEW_BINDING: &str = "androidx.viewbinding.ViewBinding";

/// Direct supertypes of known library classes
static SUPERTYPES: &[(&str, &[&str])] = &[
    // Application
    ("android.app.Application", &["android.content.ContextWrapper"]),
    ("androidx.multidex.MultiDexApplication", &["android.app.Application"]),
    ("android.content.ContextWrapper", &["android.content.Context"]),
    ("android.content.Context", &[]),
    ("android.view.ContextThemeWrapper", &["android.content.ContextWrapper"]),
    // Activities
    ("android.app.Activity", &["android.view.ContextThemeWrapper"]),
    ("androidx.activity.ComponentActivity", &["androidx.core.app.ComponentActivity"]),
    ("androidx.core.app.ComponentActivity", &["android.app.Activity"]),
    ("androidx.fragment.app.FragmentActivity", &["androidx.activity.ComponentActivity"]),
    ("androidx.appcompat.app.AppCompatActivity", &["androidx.fragment.app.FragmentActivity"]),
    // Fragments
    ("androidx.fragment.app.Fragment", &[]),
    ("androidx.fragment.app.DialogFragment", &["androidx.fragment.app.Fragment"]),
    ("androidx.fragment.app.ListFragment", &["androidx.fragment.app.Fragment"]),
    ("androidx.appcompat.app.AppCompatDialogFragment", &["androidx.fragment.app.DialogFragment"]),
    (
        "com.google.android.material.bottomsheet.BottomSheetDialogFragment",
        &["androidx.appcompat.app.AppCompatDialogFragment"],
    ),
    ("androidx.preference.PreferenceFragmentCompat", &["androidx.fragment.app.Fragment"]),
    ("androidx.navigation.fragment.NavHostFragment", &["androidx.fragment.app.Fragment"]),
    // Views
    ("android.view.View", &[]),
    ("android.view.ViewGroup", &["android.view.View"]),
    ("android.widget.FrameLayout", &["android.view.ViewGroup"]),
    ("android.widget.LinearLayout", &["android.view.ViewGroup"]),
    ("android.widget.RelativeLayout", &["android.view.ViewGroup"]),
    ("android.widget.TextView", &["android.view.View"]),
    ("android.widget.Button", &["android.widget.TextView"]),
    ("android.widget.EditText", &["android.widget.TextView"]),
    ("android.widget.ImageView", &["android.view.View"]),
    ("android.webkit.WebView", &["android.widget.AbsoluteLayout"]),
    ("android.widget.AbsoluteLayout", &["android.view.ViewGroup"]),
    ("androidx.constraintlayout.widget.ConstraintLayout", &["android.view.ViewGroup"]),
    ("androidx.coordinatorlayout.widget.CoordinatorLayout", &["android.view.ViewGroup"]),
    ("androidx.recyclerview.widget.RecyclerView", &["android.view.ViewGroup"]),
    ("androidx.cardview.widget.CardView", &["android.widget.FrameLayout"]),
    ("androidx.fragment.app.FragmentContainerView", &["android.widget.FrameLayout"]),
    ("androidx.appcompat.widget.AppCompatTextView", &["android.widget.TextView"]),
    ("androidx.appcompat.widget.AppCompatImageView", &["android.widget.ImageView"]),
    ("androidx.compose.ui.platform.AbstractComposeView", &["android.view.ViewGroup"]),
    ("androidx.compose.ui.platform.ComposeView", &["androidx.compose.ui.platform.AbstractComposeView"]),
    // View models
    ("androidx.lifecycle.ViewModel", &[]),
    ("androidx.lifecycle.AndroidViewModel", &["androidx.lifecycle.ViewModel"]),
    // Bindings
    ("androidx.viewbinding.ViewBinding", &[]),
    ("androidx.databinding.ViewDataBinding", &["androidx.viewbinding.ViewBinding"]),
];

/// Direct supertypes of a known library class
pub fn supertypes(fqn: &str) -> Option<&'static [&'static str]> {
    SUPERTYPES
        .iter()
        .find(|(name, _)| *name == fqn)
        .map(|(_, parents)| *parents)
}

/// Qualified name of a known library class by its simple name
pub fn qualified_name(simple_name: &str) -> Option<&'static str> {
    SUPERTYPES
        .iter()
        .map(|(name, _)| *name)
        .find(|name| name.rsplit('.').next() == Some(simple_name))
}

/// Binding classes generated by the Android Gradle plugin live in the
/// `<namespace>.databinding` package and end in `Binding`.
pub fn is_generated_binding(fqn: &str) -> bool {
    let Some((package, simple_name)) = fqn.rsplit_once('.') else {
        return false;
    };
    package.ends_with(".databinding")
        && simple_name.len() > "Binding".len()
        && simple_name.ends_with("Binding")
        && simple_name.starts_with(|c: char| c.is_uppercase())
}
