//! Gazebo descriptor text (SDF model, model manifest, world).
//!
//! The descriptors are fixed boilerplate around a single static model that
//! references the exported mesh through a `model://` URI. Output is a pure
//! function of the map name, so re-packaging a map rewrites byte-identical
//! files.

/// File extension of the exported mesh
pub const MESH_EXTENSION: &str = "stl";

/// File extension of model and world descriptors
pub const DESCRIPTOR_EXTENSION: &str = "sdf";

/// Model manifest filename
pub const MANIFEST_FILENAME: &str = "model.config";

/// Mass declared on the static map link (kg)
pub const MODEL_MASS: f64 = 15.0;

/// World name declared in generated world files
pub const WORLD_NAME: &str = "playground";

/// URI of the mesh as seen from Gazebo's model path
pub fn mesh_uri(name: &str) -> String {
    format!("model://{name}/meshes/{name}.{MESH_EXTENSION}")
}

/// `<model>` element shared by the model and world descriptors.
fn model_element(name: &str, indent: &str) -> String {
    let uri = mesh_uri(name);
    let body = format!(
        r#"<model name="{name}">
  <link name="link">
    <inertial>
      <mass>{MODEL_MASS}</mass>
      <inertia>
        <ixx>0.0</ixx>
        <ixy>0.0</ixy>
        <ixz>0.0</ixz>
        <iyy>0.0</iyy>
        <iyz>0.0</iyz>
        <izz>0.0</izz>
      </inertia>
    </inertial>
    <collision name="collision">
      <pose>0 0 0 0 0 0</pose>
      <geometry>
        <mesh>
          <uri>{uri}</uri>
        </mesh>
      </geometry>
    </collision>
    <visual name="visual">
      <pose>0 0 0 0 0 0</pose>
      <geometry>
        <mesh>
          <uri>{uri}</uri>
        </mesh>
      </geometry>
      <material>
        <ambient>1 1 1 1</ambient>
        <diffuse>1 1 1 1</diffuse>
        <specular>0.5 0.5 0.5 1</specular>
        <emissive>0 0 0 1</emissive>
      </material>
    </visual>
  </link>
  <static>1</static>
</model>"#
    );

    body.lines()
        .map(|line| format!("{indent}{line}\n"))
        .collect()
}

/// Standalone model descriptor (`<name>.sdf` inside the model directory).
pub fn model_sdf(name: &str) -> String {
    format!(
        "<?xml version=\"1.0\" ?>\n<sdf version=\"1.4\">\n{}</sdf>\n",
        model_element(name, "  ")
    )
}

/// Model manifest (`model.config`) pointing at the model descriptor.
pub fn model_config(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<model>
  <name>{name}</name>
  <version>1.0</version>
  <sdf version="1.5">{name}.{DESCRIPTOR_EXTENSION}</sdf>
  <author>
    <name>vastu-mesh</name>
    <email></email>
  </author>
  <description>Extruded occupancy grid map {name}</description>
</model>
"#
    )
}

/// World descriptor: ground plane, sun, physics plugins and the map model.
pub fn world_sdf(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" ?>
<sdf version="1.8">
  <world name="{WORLD_NAME}">

    <gravity>0 0 -9.8</gravity>
    <physics default="0" name="default_physics" type="ode">
      <max_step_size>0.01</max_step_size>
      <real_time_factor>1</real_time_factor>
      <real_time_update_rate>100</real_time_update_rate>
    </physics>

    <plugin
      filename="gz-sim-physics-system"
      name="gz::sim::systems::Physics">
    </plugin>
    <plugin
      filename="gz-sim-user-commands-system"
      name="gz::sim::systems::UserCommands">
    </plugin>
    <plugin
      filename="gz-sim-scene-broadcaster-system"
      name="gz::sim::systems::SceneBroadcaster">
    </plugin>

    <light name="sun" type="directional">
      <cast_shadows>true</cast_shadows>
      <pose>0 0 10 0 0 0</pose>
      <diffuse>0.8 0.8 0.8 1</diffuse>
      <specular>0.2 0.2 0.2 1</specular>
      <attenuation>
        <range>1000</range>
        <constant>0.9</constant>
        <linear>0.01</linear>
        <quadratic>0.001</quadratic>
      </attenuation>
      <direction>-0.5 0.1 -0.9</direction>
    </light>

    <model name="ground_plane">
      <static>true</static>
      <link name="link">
        <collision name="collision">
          <geometry>
            <plane>
              <normal>0 0 1</normal>
              <size>100 100</size>
            </plane>
          </geometry>
        </collision>
        <visual name="visual">
          <geometry>
            <plane>
              <normal>0 0 1</normal>
              <size>100 100</size>
            </plane>
          </geometry>
          <material>
            <ambient>0.8 0.8 0.8 1</ambient>
            <diffuse>0.8 0.8 0.8 1</diffuse>
            <specular>0.8 0.8 0.8 1</specular>
          </material>
        </visual>
      </link>
    </model>

{model}  </world>
</sdf>
"#,
        model = model_element(name, "    ")
    )
}
