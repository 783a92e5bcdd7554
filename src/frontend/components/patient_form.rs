use leptos::prelude::*;
use patients_care::models::RequestPatient;
use patients_care::validation::{PatientForm, ValidationErrors};

use super::form_field::TextField;

/// Add/edit form for a patient. Only a valid form reaches `on_submit`.
#[component]
pub fn PatientFormView(
    #[prop(optional)] initial: PatientForm,
    submit_label: &'static str,
    #[prop(into)] busy: Signal<bool>,
    on_submit: Callback<RequestPatient>,
) -> impl IntoView {
    let name = RwSignal::new(initial.name);
    let surname = RwSignal::new(initial.surname);
    let phone_number = RwSignal::new(initial.phone_number);
    let state = RwSignal::new(initial.state);
    let city = RwSignal::new(initial.city);
    let avenue = RwSignal::new(initial.avenue);
    let errors = RwSignal::new(None::<ValidationErrors>);

    let on_form_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = PatientForm {
            name: name.get_untracked(),
            surname: surname.get_untracked(),
            phone_number: phone_number.get_untracked(),
            state: state.get_untracked(),
            city: city.get_untracked(),
            avenue: avenue.get_untracked(),
        };
        match form.validate() {
            Ok(request) => {
                errors.set(None);
                on_submit.run(request);
            }
            Err(e) => errors.set(Some(e)),
        }
    };

    view! {
        <form on:submit=on_form_submit class="grid grid-cols-1 md:grid-cols-2 gap-4 max-w-3xl">
            <TextField label="Name" field="name" value=name errors/>
            <TextField label="Surname" field="surname" value=surname errors/>
            <TextField label="Phone number" field="phoneNumber" value=phone_number errors input_type="tel"/>
            <TextField label="State" field="state" value=state errors/>
            <TextField label="City" field="city" value=city errors/>
            <TextField label="Avenue" field="avenue" value=avenue errors/>
            <div class="md:col-span-2 flex justify-end gap-2">
                <a href="/allPatients" class="px-4 py-2 rounded border border-ctp-surface1 text-ctp-text hover:border-ctp-blue">
                    "Cancel"
                </a>
                <button
                    type="submit"
                    disabled=move || busy.get()
                    class="px-4 py-2 rounded bg-ctp-blue text-ctp-base font-medium disabled:opacity-50"
                >
                    {submit_label}
                </button>
            </div>
        </form>
    }
}
