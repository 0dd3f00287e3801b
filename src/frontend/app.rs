use gloo::history::{BrowserHistory, History, HistoryListener};
use log::debug;
use yew::prelude::*;

use chesstempo::router::Params;
use chesstempo::{Router, ViewId};

use crate::{game, lobby, not_found};

/// Renders one page. Gets the route params and a callback that navigates to
/// an application path.
pub type ViewFn = fn(&Params, &Callback<String>) -> Html;

/// Path the application is served under.
const BASE: &str = "/";

fn load_view(view: ViewId) -> ViewFn {
    match view {
        ViewId::Lobby => lobby::page,
        ViewId::Game => game::page,
        ViewId::NotFound => not_found::page,
    }
}

pub enum Msg {
    LocationChanged,
    Navigate(String),
}

pub struct App {
    router: Router<ViewFn>,
    history: BrowserHistory,
    _listener: HistoryListener,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let history = BrowserHistory::new();
        let link = ctx.link().clone();
        let listener = history.listen(move || link.send_message(Msg::LocationChanged));

        Self {
            router: Router::app(BASE, load_view),
            history,
            _listener: listener,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::LocationChanged => true,
            Msg::Navigate(path) => {
                // The history listener re-renders us.
                self.history.push(self.router.href(&path));
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let onnavigate = ctx.link().callback(Msg::Navigate);
        let location = self.history.location();

        let page = match self.router.resolve(location.path()) {
            Some(route) => {
                debug!("{} -> {}", location.path(), route.name);
                (route.view)(&route.params, &onnavigate)
            }
            None => not_found::page(&Params::new(), &onnavigate),
        };

        html! {
            <div class="container mx-auto px-4 py-8">
                <h1 class="text-4xl font-bold mb-8 text-center">
                    <a href={self.router.href("/")} onclick={link_to(&onnavigate, "/")}>{"Chesstempo"}</a>
                </h1>
                { page }
            </div>
        }
    }
}

/// Click handler for an in-app link: navigates through the history
/// instead of reloading the page.
pub fn link_to(onnavigate: &Callback<String>, path: &str) -> Callback<MouseEvent> {
    let onnavigate = onnavigate.clone();
    let path = path.to_string();
    Callback::from(move |e: MouseEvent| {
        e.prevent_default();
        onnavigate.emit(path.clone());
    })
}
