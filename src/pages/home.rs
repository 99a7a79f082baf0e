use leptos::prelude::*;

use super::PageContext;
use super::layout::Shell;

#[component]
pub fn HomePage(ctx: PageContext) -> impl IntoView {
    view! {
        <Shell title="Home" ctx=ctx>
            <section class="banner">
                <img class="banner__cover" src="/img/cover.jpg" alt="cover" />
                <div class="banner__text">
                    <h1>"Plan Your Trip With Ease"</h1>
                    <h3>"\"Rain or shine, your ride's on time\""</h3>
                    <a class="button" href="/provider">"Check out our providers across the borders!"</a>
                </div>
            </section>
        </Shell>
    }
}
