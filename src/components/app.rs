use std::rc::Rc;

use super::{map_pane::MapPane, viewer_pane::ViewerPane};
use crate::config::AppConfig;
use crate::coordinator::ClickCoordinator;
use crate::map::MapHandle;
use crate::state::InstanceSlot;
use crate::viewer::ViewerHandle;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: Rc<AppConfig>,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let map_slot = use_memo((), |_| InstanceSlot::<MapHandle>::new());
    let viewer_slot = use_memo((), |_| InstanceSlot::<ViewerHandle>::new());
    // Slot generations reported by the panes; None while a pane has no instance
    let map_live = use_state(|| None::<u32>);
    let viewer_live = use_state(|| None::<u32>);

    // Click binding: bound once both instances are live, rebound only when one is replaced
    {
        let map_slot = (*map_slot).clone();
        let viewer_slot = (*viewer_slot).clone();
        let layer_id = props.config.sequence_layer.layer_id.clone();
        use_effect_with((*map_live, *viewer_live), move |live| {
            let subscription = match *live {
                (Some(_), Some(_)) => {
                    let coordinator = ClickCoordinator::new(map_slot.clone(), viewer_slot, layer_id);
                    map_slot.with(|map| {
                        map.subscribe_click(move |point| coordinator.handle_click(point).report())
                    })
                }
                _ => None,
            };
            if subscription.is_some() {
                tracing::debug!("map click bound to image viewer");
            }
            move || drop(subscription)
        });
    }

    let on_map_live = {
        let map_live = map_live.clone();
        Callback::from(move |generation: Option<u32>| map_live.set(generation))
    };
    let on_viewer_live = {
        let viewer_live = viewer_live.clone();
        Callback::from(move |generation: Option<u32>| viewer_live.set(generation))
    };

    html! {
        <div style="display:flex; flex-direction:row; height:100vh;">
            <ViewerPane config={props.config.clone()} slot={(*viewer_slot).clone()} on_live={on_viewer_live} />
            <MapPane config={props.config.clone()} slot={(*map_slot).clone()} on_live={on_map_live} />
        </div>
    }
}
