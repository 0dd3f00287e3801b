use yew::prelude::*;

use chesstempo::router::Params;

use crate::app::link_to;

pub fn page(_params: &Params, onnavigate: &Callback<String>) -> Html {
    html! {
        <div class="p-4 bg-gray-100 rounded-lg text-center">
            <h2 class="text-2xl font-bold mb-4">{"Page not found"}</h2>
            <a class="underline" href="/" onclick={link_to(onnavigate, "/")}>{"Back to the lobby"}</a>
        </div>
    }
}
