/// Internal route prefixes and the Spanish paths shown to users.
pub const ROUTE_MAP: [(&str, &str); 11] = [
    ("/", "/inicio"),
    ("/login", "/iniciar-sesion"),
    ("/signup", "/registrarse"),
    ("/notifications", "/notificaciones"),
    ("/network", "/contactos"),
    ("/projects", "/proyectos"),
    ("/announcements", "/anuncios"),
    ("/jobs", "/trabajos"),
    ("/post", "/publicacion"),
    ("/profile", "/perfil"),
    ("/admin", "/administrador"),
];

/// `/profile/alice` -> `/perfil/alice`. Unknown paths are returned unchanged.
pub fn get_public_path(internal_path: &str) -> String {
    translate(internal_path, ROUTE_MAP.iter().map(|&(internal, public)| (internal, public)))
}

/// `/perfil/alice` -> `/profile/alice`. Unknown paths are returned unchanged.
pub fn get_internal_path(public_path: &str) -> String {
    translate(public_path, ROUTE_MAP.iter().map(|&(internal, public)| (public, internal)))
}

// Exact match wins; otherwise the longest `from` that is followed by '/'
// has its prefix swapped and the suffix kept verbatim.
fn translate<'a>(path: &str, table: impl Iterator<Item = (&'a str, &'a str)> + Clone) -> String {
    if let Some((_, to)) = table.clone().find(|(from, _)| *from == path) {
        return to.to_string();
    }

    table
        .filter(|(from, _)| {
            path.strip_prefix(from)
                .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|(from, _)| from.len())
        .map(|(from, to)| format!("{}{}", to, &path[from.len()..]))
        .unwrap_or_else(|| path.to_string())
}
