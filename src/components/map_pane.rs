use std::rc::Rc;

use web_sys::HtmlElement;
use yew::prelude::*;

use crate::config::AppConfig;
use crate::error::PaneError;
use crate::map::MapHandle;
use crate::state::InstanceSlot;

#[derive(Properties, PartialEq, Clone)]
pub struct MapPaneProps {
    pub config: Rc<AppConfig>,
    pub slot: InstanceSlot<MapHandle>,
    /// Slot generation once the map is live, `None` after teardown.
    pub on_live: Callback<Option<u32>>,
}

#[function_component(MapPane)]
pub fn map_pane(props: &MapPaneProps) -> Html {
    let container_ref = use_node_ref();

    // Mount: create the map, unmount: release it
    {
        let container_ref = container_ref.clone();
        let config = props.config.clone();
        let slot = props.slot.clone();
        let on_live = props.on_live.clone();
        use_effect_with((), move |_| {
            let created = container_ref
                .cast::<HtmlElement>()
                .ok_or(PaneError::MissingContainer)
                .and_then(|container| MapHandle::create(&container, &config));
            let installed = match created {
                Ok(handle) => {
                    on_live.emit(Some(slot.install(handle)));
                    true
                }
                Err(err) => {
                    tracing::error!("map pane not initialized: {}", err);
                    false
                }
            };
            move || {
                if installed && slot.release() {
                    on_live.emit(None);
                }
            }
        });
    }

    html! { <div id="map" ref={container_ref} style="height:100vh; width:50%;"></div> }
}
