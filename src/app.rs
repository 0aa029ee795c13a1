//! Root application component with routing and context providers.

use editor::SelectionTracker;
use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::pages::editor::{EditorActions, TeamEditorPage};
use crate::pages::{login::LoginPage, teams::TeamsPage};
use crate::state::{auth::AuthState, editor::EditorState, teams::TeamsState};
use crate::util::selection::install_selection_tracking;
use crate::util::storage::LocalStorage;

/// Root application component.
///
/// Provides all shared state contexts, starts caret tracking and sets up
/// client-side routing. Editor actions are app-scoped: debounced saves and
/// file reads can finish after the editor page is gone.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth = RwSignal::new(AuthState::restore(&LocalStorage));
    let teams = RwSignal::new(TeamsState::default());
    let editor = RwSignal::new(EditorState::default());
    let tracker = RwSignal::new(SelectionTracker::new());
    let config = ClientConfig::default();
    let actions = EditorActions::new(editor, tracker, auth, config.clone());

    provide_context(config);
    provide_context(auth);
    provide_context(teams);
    provide_context(editor);
    provide_context(tracker);
    provide_context(actions);

    install_selection_tracking(tracker);

    view! {
        <Title text="База знаний"/>

        <Router>
            <Routes fallback=|| "Страница не найдена.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=TeamsPage/>
                <Route path=(StaticSegment("team"), ParamSegment("id")) view=TeamEditorPage/>
            </Routes>
        </Router>
    }
}
