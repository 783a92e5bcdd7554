use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    path,
};
use thaw::*;

use crate::components::Notifications;
use crate::pages::{
    AccountManagement, AddPatient, AllPatients, EditPatient, Login, NotFound, Register, Start,
};
use crate::store::{provide_store, use_store};

#[component]
pub fn App() -> impl IntoView {
    // Set dark theme for Thaw UI components
    let theme = RwSignal::new(Theme::dark());
    provide_meta_context();
    provide_store();

    view! {
        <ConfigProvider theme>
            <Title text="Patients care"/>
            <Router>
                <Routes fallback=NotFound>
                    <Route path=path!("/") view=|| view! { <Redirect path="/start"/> }/>
                    <Route path=path!("/login") view=|| view! { <PublicOnly><Login/></PublicOnly> }/>
                    <Route path=path!("/register") view=|| view! { <PublicOnly><Register/></PublicOnly> }/>
                    <Route path=path!("/start") view=|| view! { <Private><Start/></Private> }/>
                    <Route path=path!("/allPatients") view=|| view! { <Private><AllPatients/></Private> }/>
                    <Route path=path!("/addPatient") view=|| view! { <Private><AddPatient/></Private> }/>
                    <Route
                        path=path!("/allPatients/editPatient/:patientId")
                        view=|| view! { <Private><EditPatient/></Private> }
                    />
                    <Route
                        path=path!("/accountManagement")
                        view=|| view! { <Private><AccountManagement/></Private> }
                    />
                </Routes>
            </Router>
            <Notifications/>
        </ConfigProvider>
    }
}

/// Renders its children only with a session; otherwise sends the user to sign in.
#[component]
fn Private(children: ChildrenFn) -> impl IntoView {
    let store = use_store();
    move || {
        if store.authenticated.get() {
            children().into_any()
        } else {
            view! { <Redirect path="/login"/> }.into_any()
        }
    }
}

/// Sign-in and registration are pointless with a session.
#[component]
fn PublicOnly(children: ChildrenFn) -> impl IntoView {
    let store = use_store();
    move || {
        if store.authenticated.get() {
            view! { <Redirect path="/allPatients"/> }.into_any()
        } else {
            children().into_any()
        }
    }
}
