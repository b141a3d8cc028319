//! Prompt preambles and curated presets.

use serde::{Deserialize, Serialize};

/// Brand style preamble prepended to every background prompt.
pub const BACKGROUND_STYLE_PROMPT: &str = concat!(
    "STYLE & PERSPECTIVE:\n",
    "Isometric 3D illustration, classic isometric projection at 30° elevation and 45° azimuth rotation. Objects anchored to the bottom-right corner of a square canvas, slightly cropped at the edges, leaving the upper-left two-thirds as open negative space. Corporate tech editorial style — similar to Notion, AWS, or ServiceNow marketing illustration style.\n",
    "BACKGROUND:\n",
    "Deep space gradient full screen background — not white or transparent. Dark navy blue (#0D0B2B) in the top-left fading into rich violet-purple (#3B2A8C) toward the center and bottom-right. Two subtle circular light bloom shapes in the top-right corner area, slightly lighter than the background, suggesting ambient light sources. No hard edges on background. No glow or starry objects on background.\n",
    "OBJECT STYLE:\n",
    "Flat-face isometric volumes with smooth color fills — no photorealistic textures or gradients. Edges defined by color value contrast between faces (top face lightest, left face mid-tone, right face darkest), not by black outlines. Very thin, subtle inner edge highlight (1px off-white) on top edges of objects to suggest sharpness. Clean geometric primitives: boxes, cylinders, rounded rectangles in isometric space. Rounded corners on all major volumes (corner radius proportional to object size).\n",
    "COLOR PALETTE:\n",
    "Purple tones (use for secondary surfaces, platforms, base layers): Deep: #897DFF, Mid: #B8A8FF, Light: #E8E3FF. Red/Coral/Salmon tones (use for focal elements, accent pieces, key interactive components): Deep: #D8242A, Mid/Salmon: #FFBDBD, Light blush: #FFEBEB. Neutral/Grey tones (use for primary object bodies, screens, hardware casings): Dark: #242C36, Mid: #C1C4CA, Light: #F4F6F7. Surface tones following isometric face logic: Top face: lightest value of the object's assigned color; Left face: mid value; Right face: darkest value (approximately 30% darker than mid).\n",
    "ACCENT & ATMOSPHERE DETAILS:\n",
    "Small scattered decorative elements floating near the main object: isometric mini-cubes, network node dots connected by thin lines, or geometric polygon outlines — in muted red or purple tones, small scale, not distracting. Subtle dotted grid or halftone texture on one surface of the main object (dark charcoal dots on a slightly lighter surface, very low opacity). If relevant to subject: thin glowing connector lines or cable-like shapes in salmon/blush pink connecting components. Drop shadow beneath the entire object cluster: very soft, dark violet, low opacity elliptical shadow on the ground plane.\n",
    "COMPOSITION:\n",
    "Main object cluster occupies roughly the bottom 50% and right 50% of the canvas. Objects may bleed slightly off the right and bottom edges. Top-left area intentionally empty — reserved for text overlay in final use. One primary focal object, supported by 1–2 smaller secondary objects at different elevations (stacked or adjacent).\n",
    "LIGHTING:\n",
    "Primary light source: top-center, slightly left. Top faces receive the most light (near-white or light tint of object color). Side faces in shadow — use darker shades from the same color family, not black. No cast shadows from objects onto background — only a faint elliptical drop shadow directly beneath.\n",
    "WHAT TO AVOID:\n",
    "No photorealistic materials, lens flares, or 3D render noise. No glow or starry objects. No heavy black outlines or cartoon-style stroke borders. No centered composition — keep objects to one corner. No white or transparent backgrounds. No text or labels within the illustration.\n",
    "\n",
    "Subject and content to depict: ",
);

/// Style preamble for storyline scene frames.
pub const SCENE_STYLE_PROMPT: &str = "Style: Simple motion graphics frame. Clean and professional. 2D or flat illustration preferred; 3D isometric view is optional. No clutter. Suitable for product demo or explainer. Frame is widescreen (16:9). Do not include text or labels in the image.\n\nContent to depict: ";

/// Where a generated image will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageContext {
    #[default]
    Hero,
    Storyline,
}

impl ImageContext {
    /// Prepend the matching style preamble to a user subject.
    pub fn full_prompt(&self, subject: &str) -> String {
        let preamble = match self {
            ImageContext::Hero => BACKGROUND_STYLE_PROMPT,
            ImageContext::Storyline => SCENE_STYLE_PROMPT,
        };
        format!("{}{}", preamble, subject.trim())
    }
}

/// A one-click starting prompt for backgrounds.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PromptGuideline {
    pub id: &'static str,
    pub name: &'static str,
    pub prompt: &'static str,
}

pub const PROMPT_GUIDELINES: &[PromptGuideline] = &[
    PromptGuideline {
        id: "data-visualization",
        name: "Data & Analytics",
        prompt: "Isometric vector illustration of abstract data visualization: smartphone screens displaying line charts and pie charts, stacked bar chart cubes in light pink, red, and lavender. Smooth dark blue to purple gradient background with subtle rounded abstract shapes in upper right. Clean lines, modern digital art style. Objects in lower right, ample negative space in upper left for text overlay.",
    },
    PromptGuideline {
        id: "laptop-workspace",
        name: "Laptop & Workspace",
        prompt: "Isometric vector illustration of an open laptop with light pink body, white keys, and bold red trackpad. Dark blue to purple radial gradient background with subtle abstract curved shapes in top right. Laptop in lower right quadrant on dark reflective surface with stylized blocky reflection. Clean outlined style, modern, professional tech aesthetic.",
    },
    PromptGuideline {
        id: "cloud-infrastructure",
        name: "Cloud & Servers",
        prompt: "Isometric illustration of cloud infrastructure: server units with cooling fans and vents, stacked storage bays, abstract network nodes connected by thin red lines. Deep indigo to violet gradient background. Light gray device bodies with dark outlines. Objects in bottom-right, significant negative space in upper left for branding.",
    },
    PromptGuideline {
        id: "computing-power",
        name: "Computing & Energy",
        prompt: "Isometric illustration of two stacked computing units with glowing pink pipeline connecting them. White lightning arcs around top device. Dark blue to rich purple gradient background with abstract rounded shapes. Light gray devices with red accents, subtle halftone pattern. Futuristic, dynamic, tech-focused. Elements in lower right, open space for text.",
    },
];

/// Bundled logos, served relative to the public base URL.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LogoOption {
    pub id: &'static str,
    pub path: &'static str,
    pub name: &'static str,
}

pub const LOGO_OPTIONS: &[LogoOption] = &[
    LogoOption { id: "logo-dark", path: "/logo/Logo-dark.png", name: "Logo Dark" },
    LogoOption { id: "logo-light", path: "/logo/Logo-light.png", name: "Logo Light" },
    LogoOption { id: "logo-v2-02", path: "/logo/Logo_v2_02.png", name: "Logo v2 02" },
    LogoOption { id: "logo-v2-default", path: "/logo/Logo_v2_default.png", name: "Logo v2 Default" },
];
