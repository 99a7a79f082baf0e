//! Document shell, top menu, and the inline notice banner.

use leptos::prelude::*;

use super::PageContext;
use crate::state::session::{Notice, Viewer};

/// Menu label for the booking list link.
#[must_use]
pub fn bookings_label(viewer: &Viewer) -> &'static str {
    match viewer {
        Viewer::Admin => "All Bookings",
        Viewer::User(_) => "My Booking",
    }
}

/// Full HTML document wrapping one screen.
#[component]
pub fn Shell(#[prop(into)] title: String, ctx: PageContext, children: Children) -> impl IntoView {
    let PageContext { viewer, notices } = ctx;
    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{format!("{title} | Bookdesk")}</title>
                <link rel="stylesheet" href="/static/app.css" />
            </head>
            <body>
                <TopMenu viewer=viewer />
                <main class="page">
                    {notices
                        .into_iter()
                        .enumerate()
                        .map(|(index, notice)| view! { <NoticeBanner notice=notice index=index /> })
                        .collect_view()}
                    {children()}
                </main>
            </body>
        </html>
    }
}

#[component]
pub fn TopMenu(viewer: Option<Viewer>) -> impl IntoView {
    let items = match viewer {
        Some(viewer) => {
            let stats = matches!(viewer, Viewer::Admin)
                .then(|| view! { <a class="menu__item menu__item--stats" href="/stats">"View Stats"</a> });
            view! {
                <a class="menu__item" href="/mybooking">{bookings_label(&viewer)}</a>
                {stats}
                <a class="menu__item" href="/changepassword">"Change Password"</a>
                <form class="menu__signout" method="post" action="/signout">
                    <button class="menu__item menu__item--primary" type="submit">"Sign-Out"</button>
                </form>
            }
            .into_any()
        }
        None => view! {
            <a class="menu__item" href="/signin">"Sign-In"</a>
            <a class="menu__item menu__item--primary" href="/register">"Register"</a>
        }
        .into_any(),
    };

    view! {
        <nav class="menu">
            <a class="menu__logo" href="/">
                <img src="/img/logo.png" alt="Logo" width="50" height="25" />
            </a>
            <div class="menu__items">{items}</div>
        </nav>
    }
}

/// Dismissible one-shot message. Dismissal is a CSS checkbox toggle so it
/// works without scripts and never re-submits a form. `index` keeps toggle
/// ids unique when several notices share a page.
#[component]
pub fn NoticeBanner(notice: Notice, index: usize) -> impl IntoView {
    let class = format!("notice notice--{}", notice.kind.as_str());
    let toggle = format!("notice-dismiss-{index}");
    view! {
        <input class="notice__toggle" type="checkbox" id=toggle.clone() hidden=true />
        <div class=class role="status">
            <span class="notice__text">{notice.text}</span>
            <label class="notice__dismiss" for=toggle aria-label="Dismiss">"×"</label>
        </div>
    }
}
