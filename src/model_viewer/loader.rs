use crate::model_viewer::error::AssetLoadError;
use bevy::asset::RecursiveDependencyLoadState;
use bevy::prelude::{AssetServer, FromWorld, Handle, Resource, Scene, World};
use tracing::debug;

/// One issued load request. `seq` grows monotonically per session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub seq: u64,
    pub model: String,
    pub path: String,
}

#[derive(Debug)]
pub struct LoadCompletion<A> {
    pub ticket: LoadTicket,
    pub result: Result<A, AssetLoadError>,
}

/// Fetches model assets in the background. Never touches the scene itself.
pub trait ModelLoader {
    type Asset;

    fn start(&mut self, ticket: LoadTicket);

    /// Drains every request that finished since the last call, in completion order.
    fn poll_completed(&mut self) -> Vec<LoadCompletion<Self::Asset>>;
}

struct PendingLoad {
    ticket: LoadTicket,
    handle: Handle<Scene>,
}

/// Loads the first scene of a glTF file through the Bevy asset server.
///
/// A request counts as complete once the scene and all of its dependencies
/// (meshes, materials, textures) are loaded, so the root can be spawned whole.
#[derive(Resource)]
pub struct GltfSceneLoader {
    server: AssetServer,
    pending: Vec<PendingLoad>,
}

impl FromWorld for GltfSceneLoader {
    fn from_world(world: &mut World) -> Self {
        Self {
            server: world.resource::<AssetServer>().clone(),
            pending: Vec::new(),
        }
    }
}

impl ModelLoader for GltfSceneLoader {
    type Asset = Handle<Scene>;

    fn start(&mut self, ticket: LoadTicket) {
        let handle = self.server.load(format!("{}#Scene0", ticket.path));
        debug!(seq = ticket.seq, path = %ticket.path, "asset load started");
        self.pending.push(PendingLoad { ticket, handle });
    }

    fn poll_completed(&mut self) -> Vec<LoadCompletion<Handle<Scene>>> {
        let mut completed = Vec::new();
        for load in std::mem::take(&mut self.pending) {
            match self
                .server
                .recursive_dependency_load_state(load.handle.id())
            {
                RecursiveDependencyLoadState::Loaded => completed.push(LoadCompletion {
                    ticket: load.ticket,
                    result: Ok(load.handle),
                }),
                RecursiveDependencyLoadState::Failed(err) => {
                    let error = AssetLoadError {
                        path: load.ticket.path.clone(),
                        cause: err.to_string(),
                    };
                    completed.push(LoadCompletion {
                        ticket: load.ticket,
                        result: Err(error),
                    });
                }
                _ => self.pending.push(load),
            }
        }
        completed
    }
}
