//! Loader definitions for the standard network inventory entity types.

use seed_core::Record;

use crate::loader::{Association, LoaderSpec, PreProcess};

const TENANT: Association = Association::by_name("tenant", "Tenant");
const SITE: Association = Association::by_name("site", "Site");
const LOCATION: Association = Association::by_name("location", "Location");
const VRF: Association = Association::by_name("vrf", "VRF");
const IPAM_ROLE: Association = Association::by_name("role", "Role");

pub const USERS: LoaderSpec =
    LoaderSpec::new("users", "user", "👤", "User", "users.yml").unique(&["username"]);

pub const GROUPS: LoaderSpec =
    LoaderSpec::new("groups", "group", "👥", "Group", "groups.yml").unique(&["name"]);

pub const OBJECT_PERMISSIONS: LoaderSpec = LoaderSpec::new(
    "object_permissions",
    "object permission",
    "🔓",
    "ObjectPermission",
    "object_permissions.yml",
)
.unique(&["name"]);

/// Descriptors for extended attributes. `on_objects` lists the entity types a
/// field applies to.
pub const CUSTOM_FIELDS: LoaderSpec = LoaderSpec::new(
    "custom_fields",
    "custom field",
    "🔧",
    seed_store::CUSTOM_FIELD_TYPE,
    "custom_fields.yml",
)
.unique(&["name"]);

pub const CUSTOM_LINKS: LoaderSpec =
    LoaderSpec::new("custom_links", "custom link", "🔗", "CustomLink", "custom_links.yml")
        .unique(&["name"]);

pub const TAGS: LoaderSpec = LoaderSpec::new("tags", "tag", "🎨", "Tag", "tags.yml");

pub const WEBHOOKS: LoaderSpec =
    LoaderSpec::new("webhooks", "webhook", "🪝", "Webhook", "webhooks.yml").unique(&["name"]);

pub const TENANT_GROUPS: LoaderSpec =
    LoaderSpec::new("tenant_groups", "tenant group", "🔳", "TenantGroup", "tenant_groups.yml")
        .optional(&[Association::by_name("parent", "TenantGroup")]);

pub const TENANTS: LoaderSpec = LoaderSpec::new("tenants", "tenant", "👩‍💻", "Tenant", "tenants.yml")
    .optional(&[Association::by_name("group", "TenantGroup")]);

pub const REGIONS: LoaderSpec = LoaderSpec::new("regions", "region", "🌐", "Region", "regions.yml")
    .optional(&[Association::by_name("parent", "Region")]);

pub const SITES: LoaderSpec = LoaderSpec::new("sites", "site", "📍", "Site", "sites.yml")
    .optional(&[Association::by_name("region", "Region"), TENANT]);

pub const LOCATIONS: LoaderSpec =
    LoaderSpec::new("locations", "location", "🎁", "Location", "locations.yml")
        .required(&[SITE])
        .optional(&[Association::by_name("parent", "Location"), TENANT]);

pub const RACK_ROLES: LoaderSpec =
    LoaderSpec::new("rack_roles", "rack role", "🎨", "RackRole", "rack_roles.yml");

pub const RACKS: LoaderSpec = LoaderSpec::new("racks", "rack", "🔳", "Rack", "racks.yml")
    .unique(&["name", "site"])
    .required(&[SITE])
    .optional(&[Association::by_name("role", "RackRole"), TENANT, LOCATION]);

pub const POWER_PANELS: LoaderSpec =
    LoaderSpec::new("power_panels", "power panel", "⚡", "PowerPanel", "power_panels.yml")
        .unique(&["name", "site"])
        .required(&[SITE])
        .optional(&[LOCATION]);

pub const POWER_FEEDS: LoaderSpec =
    LoaderSpec::new("power_feeds", "power feed", "⚡", "PowerFeed", "power_feeds.yml")
        .unique(&["name", "power_panel"])
        .required(&[Association::by_name("power_panel", "PowerPanel")])
        .optional(&[Association::by_name("rack", "Rack")]);

pub const MANUFACTURERS: LoaderSpec =
    LoaderSpec::new("manufacturers", "manufacturer", "🏭", "Manufacturer", "manufacturers.yml");

pub const DEVICE_ROLES: LoaderSpec =
    LoaderSpec::new("device_roles", "device role", "🎨", "DeviceRole", "device_roles.yml");

pub const DEVICE_TYPES: LoaderSpec =
    LoaderSpec::new("device_types", "device type", "🔡", "DeviceType", "device_types.yml")
        .unique(&["model", "slug"])
        .required(&[Association::by_name("manufacturer", "Manufacturer")]);

/// Devices. Primary addresses are assigned later by [`PRIMARY_IPS`], once the
/// addresses exist.
pub const DEVICES: LoaderSpec = LoaderSpec::new("devices", "device", "🖥", "Device", "devices.yml")
    .unique(&["device_type", "name", "site"])
    .required(&[
        Association::by_name("device_role", "DeviceRole"),
        Association::new("device_type", "DeviceType", "model"),
        SITE,
    ])
    .optional(&[
        TENANT,
        Association::by_name("platform", "Platform"),
        Association::by_name("rack", "Rack"),
        Association::by_name("cluster", "Cluster"),
        LOCATION,
    ])
    .ignored(&["primary_ipv4", "primary_ipv6"]);

pub const INTERFACES: LoaderSpec =
    LoaderSpec::new("interfaces", "interface", "🧷", "Interface", "interfaces.yml")
        .unique(&["device", "name"])
        .required(&[Association::by_name("device", "Device")]);

pub const PLATFORMS: LoaderSpec =
    LoaderSpec::new("platforms", "platform", "💾", "Platform", "platforms.yml")
        .optional(&[Association::by_name("manufacturer", "Manufacturer")]);

pub const ROUTE_TARGETS: LoaderSpec =
    LoaderSpec::new("route_targets", "route target", "🎯", "RouteTarget", "route_targets.yml")
        .unique(&["name"])
        .optional(&[TENANT]);

pub const VRFS: LoaderSpec = LoaderSpec::new("vrfs", "VRF", "📦", "VRF", "vrfs.yml")
    .unique(&["name", "rd"])
    .optional(&[TENANT]);

pub const RIRS: LoaderSpec = LoaderSpec::new("rirs", "RIR", "🗺️", "RIR", "rirs.yml");

pub const ASNS: LoaderSpec = LoaderSpec::new("asns", "ASN", "🔢", "ASN", "asns.yml")
    .unique(&["asn", "rir"])
    .required(&[Association::by_name("rir", "RIR")])
    .optional(&[TENANT]);

pub const AGGREGATES: LoaderSpec =
    LoaderSpec::new("aggregates", "aggregate", "🗞️", "Aggregate", "aggregates.yml")
        .unique(&["prefix"])
        .required(&[Association::by_name("rir", "RIR")])
        .optional(&[TENANT]);

pub const PREFIX_VLAN_ROLES: LoaderSpec = LoaderSpec::new(
    "prefix_vlan_roles",
    "prefix/VLAN role",
    "⛹️",
    "Role",
    "prefix_vlan_roles.yml",
);

pub const CLUSTER_TYPES: LoaderSpec =
    LoaderSpec::new("cluster_types", "cluster type", "🧰", "ClusterType", "cluster_types.yml");

pub const CLUSTER_GROUPS: LoaderSpec =
    LoaderSpec::new("cluster_groups", "cluster group", "🗄️", "ClusterGroup", "cluster_groups.yml");

pub const CLUSTERS: LoaderSpec = LoaderSpec::new("clusters", "cluster", "🗄️", "Cluster", "clusters.yml")
    .unique(&["name"])
    .required(&[Association::by_name("type", "ClusterType")])
    .optional(&[Association::by_name("group", "ClusterGroup"), SITE, TENANT]);

pub const VLAN_GROUPS: LoaderSpec =
    LoaderSpec::new("vlan_groups", "VLAN group", "🏘️", "VLANGroup", "vlan_groups.yml");

pub const VLANS: LoaderSpec = LoaderSpec::new("vlans", "VLAN", "🏠", "VLAN", "vlans.yml")
    .unique(&["name", "vid"])
    .optional(&[
        SITE,
        TENANT,
        Association::by_name("group", "VLANGroup"),
        IPAM_ROLE,
    ]);

pub const VIRTUAL_MACHINES: LoaderSpec = LoaderSpec::new(
    "virtual_machines",
    "virtual machine",
    "🖥️",
    "VirtualMachine",
    "virtual_machines.yml",
)
.unique(&["name"])
.required(&[Association::by_name("cluster", "Cluster")])
.optional(&[
    Association::by_name("role", "DeviceRole"),
    TENANT,
    Association::by_name("platform", "Platform"),
]);

pub const VIRTUALIZATION_INTERFACES: LoaderSpec = LoaderSpec::new(
    "virtualization_interfaces",
    "virtual machine interface",
    "🧷",
    "VMInterface",
    "virtualization_interfaces.yml",
)
.unique(&["virtual_machine", "name"])
.required(&[Association::by_name("virtual_machine", "VirtualMachine")]);

pub const PREFIXES: LoaderSpec = LoaderSpec::new("prefixes", "prefix", "📌", "Prefix", "prefixes.yml")
    .unique(&["prefix", "vrf"])
    .optional(&[SITE, TENANT, Association::by_name("vlan", "VLAN"), VRF, IPAM_ROLE]);

pub const IP_ADDRESSES: LoaderSpec =
    LoaderSpec::new("ip_addresses", "IP address", "🧬", "IPAddress", "ip_addresses.yml")
        .unique(&["address", "vrf"])
        .optional(&[TENANT, VRF]);

/// Second pass over `devices.yml`: assigns primary addresses to devices that
/// already exist.
pub const PRIMARY_IPS: LoaderSpec =
    LoaderSpec::new("primary_ips", "primary IP", "🧬", "Device", "devices.yml")
        .unique(&["name"])
        .keyed_by("device_type")
        .optional(&[
            Association::new("primary_ip4", "IPAddress", "address"),
            Association::new("primary_ip6", "IPAddress", "address"),
        ])
        .completing_existing()
        .with_pre_process(primary_ip_fields);

pub const SERVICES: LoaderSpec = LoaderSpec::new("services", "service", "🧰", "Service", "services.yml")
    .unique(&["name", "device", "virtual_machine"])
    .optional(&[
        Association::by_name("device", "Device"),
        Association::by_name("virtual_machine", "VirtualMachine"),
    ]);

pub const PROVIDERS: LoaderSpec =
    LoaderSpec::new("providers", "provider", "📡", "Provider", "providers.yml");

pub const CIRCUIT_TYPES: LoaderSpec =
    LoaderSpec::new("circuit_types", "circuit type", "⚡", "CircuitType", "circuit_types.yml");

pub const CIRCUITS: LoaderSpec = LoaderSpec::new("circuits", "circuit", "⚡", "Circuit", "circuits.yml")
    .unique(&["cid"])
    .required(&[
        Association::by_name("provider", "Provider"),
        Association::by_name("type", "CircuitType"),
    ])
    .optional(&[TENANT]);

pub const CABLES: LoaderSpec =
    LoaderSpec::new("cables", "cable", "🔌", "Cable", "cables.yml").unique(&["label"]);

pub const CONTACT_GROUPS: LoaderSpec =
    LoaderSpec::new("contact_groups", "contact group", "📇", "ContactGroup", "contact_groups.yml")
        .optional(&[Association::by_name("parent", "ContactGroup")]);

pub const CONTACT_ROLES: LoaderSpec =
    LoaderSpec::new("contact_roles", "contact role", "📇", "ContactRole", "contact_roles.yml");

pub const CONTACTS: LoaderSpec = LoaderSpec::new("contacts", "contact", "👩‍🔧", "Contact", "contacts.yml")
    .unique(&["name"])
    .optional(&[Association::by_name("group", "ContactGroup")]);

/// Every standard loader.
pub const LOADERS: &[LoaderSpec] = &[
    USERS,
    GROUPS,
    OBJECT_PERMISSIONS,
    CUSTOM_FIELDS,
    CUSTOM_LINKS,
    TAGS,
    WEBHOOKS,
    TENANT_GROUPS,
    TENANTS,
    REGIONS,
    SITES,
    LOCATIONS,
    RACK_ROLES,
    RACKS,
    POWER_PANELS,
    POWER_FEEDS,
    MANUFACTURERS,
    DEVICE_ROLES,
    DEVICE_TYPES,
    DEVICES,
    INTERFACES,
    PLATFORMS,
    ROUTE_TARGETS,
    VRFS,
    RIRS,
    ASNS,
    AGGREGATES,
    PREFIX_VLAN_ROLES,
    CLUSTER_TYPES,
    CLUSTER_GROUPS,
    CLUSTERS,
    VLAN_GROUPS,
    VLANS,
    VIRTUAL_MACHINES,
    VIRTUALIZATION_INTERFACES,
    PREFIXES,
    IP_ADDRESSES,
    PRIMARY_IPS,
    SERVICES,
    PROVIDERS,
    CIRCUIT_TYPES,
    CIRCUITS,
    CABLES,
    CONTACT_GROUPS,
    CONTACT_ROLES,
    CONTACTS,
];

/// Keep only the device name and its primary addresses, renamed to the
/// device's field names. Devices without primary addresses need nothing.
fn primary_ip_fields(mut record: Record) -> PreProcess {
    let mut out = Record::new();
    if let Some(name) = record.shift_remove("name") {
        out.insert("name".into(), name);
    }
    for (from, to) in [("primary_ipv4", "primary_ip4"), ("primary_ipv6", "primary_ip6")] {
        match record.shift_remove(from) {
            Some(value) if !value.is_blank() => {
                out.insert(to.into(), value);
            }
            _ => {}
        }
    }
    if out.contains_key("primary_ip4") || out.contains_key("primary_ip6") {
        PreProcess::Proceed(out)
    } else {
        PreProcess::Skip
    }
}
