//! Sign-in, registration, and password change forms. Failures arrive as the
//! notice in `PageContext`; the handlers re-render the form with it.

use leptos::prelude::*;

use super::PageContext;
use super::layout::Shell;

#[component]
pub fn SignInPage(ctx: PageContext, #[prop(into)] email: String) -> impl IntoView {
    view! {
        <Shell title="Sign In" ctx=ctx>
            <section class="form-card">
                <h1 class="page__title">"Sign In"</h1>
                <form class="form" method="post" action="/signin">
                    <label class="form__label" for="email">"Email"</label>
                    <input class="form__input" id="email" type="email" name="email" value=email required=true />
                    <label class="form__label" for="password">"Password"</label>
                    <input class="form__input" id="password" type="password" name="password" required=true />
                    <button class="button" type="submit">"Sign In"</button>
                </form>
                <p class="form__hint">"No account yet? " <a href="/register">"Register"</a></p>
            </section>
        </Shell>
    }
}

#[component]
pub fn RegisterPage(ctx: PageContext, #[prop(into)] name: String, #[prop(into)] email: String) -> impl IntoView {
    view! {
        <Shell title="Create Account" ctx=ctx>
            <section class="form-card">
                <h1 class="page__title">"Create Account"</h1>
                <form class="form" method="post" action="/register">
                    <label class="form__label" for="name">"Name"</label>
                    <input class="form__input" id="name" type="text" name="name" value=name required=true />
                    <label class="form__label" for="email">"Email"</label>
                    <input class="form__input" id="email" type="email" name="email" value=email required=true />
                    <label class="form__label" for="password">"Password"</label>
                    <input class="form__input" id="password" type="password" name="password" required=true />
                    <button class="button" type="submit">"Register"</button>
                </form>
            </section>
        </Shell>
    }
}

#[component]
pub fn ChangePasswordPage(ctx: PageContext) -> impl IntoView {
    view! {
        <Shell title="Change Password" ctx=ctx>
            <section class="form-card">
                <h1 class="page__title">"Change Password"</h1>
                <form class="form" method="post" action="/changepassword">
                    <label class="form__label" for="current_password">"Current Password"</label>
                    <input
                        class="form__input"
                        id="current_password"
                        type="password"
                        name="current_password"
                        required=true
                    />
                    <label class="form__label" for="new_password">"New Password"</label>
                    <input class="form__input" id="new_password" type="password" name="new_password" required=true />
                    <button class="button" type="submit">"Change Password"</button>
                </form>
            </section>
        </Shell>
    }
}
