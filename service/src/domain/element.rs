//! [`Element`] and [`PropertyOption`] definitions.

use common::define_kind;

use super::ConfigurationError;

define_kind! {
    #[doc = "Constructive category of a building."]
    enum Element {
        #[doc = "Foundations."]
        Foundations => "Foundations",

        #[doc = "Structural concrete."]
        Concrete => "Concrete",

        #[doc = "Walling."]
        Brickwork => "Brickwork",

        #[doc = "Roof structure carrying the cover."]
        RoofStructure => "RoofStructure",

        #[doc = "Roof cover."]
        RoofingCover => "RoofingCover",

        #[doc = "Ceilings."]
        Ceilings => "Ceilings",

        #[doc = "Windows."]
        Windows => "Windows",

        #[doc = "Doors."]
        Doors => "Doors",

        #[doc = "Floor finishes."]
        FloorFinishes => "FloorFinishes",

        #[doc = "Wall finishes."]
        WallFinishes => "WallFinishes",

        #[doc = "Plumbing and sanitary fittings."]
        Plumbing => "Plumbing",

        #[doc = "Electrical installation."]
        Electrical => "Electrical",

        #[doc = "Painting."]
        Painting => "Painting",

        #[doc = "Veranda, charged per veranda area."]
        Veranda => "Veranda",

        #[doc = "Boundary wall."]
        BoundaryWall => "Boundary_Wall",

        #[doc = "Electric fence on top of a boundary wall."]
        ElectricFence => "ElectricFence",

        #[doc = "Gate."]
        Gate => "Gate",

        #[doc = "Swimming pool."]
        SwimmingPool => "SwimmingPool",

        #[doc = "Paving."]
        Paving => "Paving",

        #[doc = "Car port, charged per its own area."]
        CarPort => "CarPort",
    }
}

impl Element {
    /// [`Element`]s every residential building consists of.
    pub const BASELINE: &'static [Self] = &[
        Self::Foundations,
        Self::Concrete,
        Self::Brickwork,
        Self::RoofStructure,
        Self::RoofingCover,
        Self::Ceilings,
        Self::Windows,
        Self::Doors,
        Self::FloorFinishes,
        Self::WallFinishes,
        Self::Plumbing,
        Self::Electrical,
        Self::Painting,
        Self::Veranda,
    ];

    /// Parses an [`Element`] from its textual identifier.
    ///
    /// # Errors
    ///
    /// If the identifier doesn't name any [`Element`].
    pub fn parse(s: &str) -> Result<Self, ConfigurationError> {
        s.trim()
            .parse()
            .map_err(|_| ConfigurationError::UnknownElement(s.to_owned()))
    }

    /// Indicates whether this [`Element`] is charged per its own area rather
    /// than per the floor area of a building.
    #[must_use]
    pub fn is_separately_charged(self) -> bool {
        matches!(self, Self::Veranda | Self::CarPort)
    }
}

pub mod option {
    //! Closed sets of options available for each [`Element`].
    //!
    //! Identifiers are unique across all the sets, as they key reference
    //! rates.
    //!
    //! [`Element`]: super::Element

    use common::define_kind;

    define_kind! {
        #[doc = "Options of the `Foundations` element."]
        enum Foundations {
            #[doc = "Strip footing."]
            StripFooting => "STRIP_FOOTING",

            #[doc = "Raft foundation."]
            RaftFoundation => "RAFT_FOUNDATION",

            #[doc = "Pad footing."]
            PadFooting => "PAD_FOOTING",

            #[doc = "Piled foundation."]
            PileFoundation => "PILE_FOUNDATION",
        }
    }

    define_kind! {
        #[doc = "Options of the `Concrete` element."]
        enum Concrete {
            #[doc = "Mass concrete."]
            MassConcrete => "MASS_CONCRETE",

            #[doc = "Reinforced concrete."]
            ReinforcedConcrete => "REINFORCED_CONCRETE",

            #[doc = "Precast concrete."]
            PrecastConcrete => "PRECAST_CONCRETE",
        }
    }

    define_kind! {
        #[doc = "Options of the `Brickwork` element."]
        enum Brickwork {
            #[doc = "Common stock bricks."]
            StockBricks => "STOCK_BRICKS",

            #[doc = "Face bricks."]
            FaceBricks => "FACE_BRICKS",

            #[doc = "Cement bricks."]
            CementBricks => "CEMENT_BRICKS",

            #[doc = "Concrete blocks."]
            ConcreteBlocks => "CONCRETE_BLOCKS",
        }
    }

    define_kind! {
        #[doc = "Options of the `RoofStructure` element."]
        enum RoofStructure {
            #[doc = "Timber trusses."]
            TimberTrusses => "TIMBER_TRUSSES",

            #[doc = "Steel trusses."]
            SteelTrusses => "STEEL_TRUSSES",

            #[doc = "Flat concrete roof slab."]
            ConcreteRoofSlab => "CONCRETE_ROOF_SLAB",
        }
    }

    define_kind! {
        #[doc = "Options of the `RoofingCover` element."]
        enum RoofingCover {
            #[doc = "IBR profile sheeting."]
            IbrSheeting => "IBR_SHEETING",

            #[doc = "Corrugated iron sheeting."]
            CorrugatedIron => "CORRUGATED_IRON",

            #[doc = "Concrete roof tiles."]
            ConcreteTiles => "CONCRETE_TILES",

            #[doc = "Clay roof tiles."]
            ClayTiles => "CLAY_TILES",

            #[doc = "Thatch."]
            Thatch => "THATCH",
        }
    }

    define_kind! {
        #[doc = "Options of the `Ceilings` element."]
        enum Ceilings {
            #[doc = "Gypsum board."]
            GypsumBoard => "GYPSUM_BOARD",

            #[doc = "PVC panels."]
            PvcCeiling => "PVC_CEILING",

            #[doc = "Timber boards."]
            TimberCeiling => "TIMBER_CEILING",
        }
    }

    define_kind! {
        #[doc = "Options of the `Windows` element."]
        enum Windows {
            #[doc = "Steel frames."]
            SteelWindows => "STEEL_WINDOWS",

            #[doc = "Aluminium frames."]
            AluminiumWindows => "ALUMINIUM_WINDOWS",

            #[doc = "Timber frames."]
            TimberWindows => "TIMBER_WINDOWS",
        }
    }

    define_kind! {
        #[doc = "Options of the `Doors` element."]
        enum Doors {
            #[doc = "Hollow core doors."]
            HollowCoreDoors => "HOLLOW_CORE_DOORS",

            #[doc = "Solid timber doors."]
            SolidTimberDoors => "SOLID_TIMBER_DOORS",

            #[doc = "Steel doors."]
            SteelDoors => "STEEL_DOORS",
        }
    }

    define_kind! {
        #[doc = "Options of the `FloorFinishes` element."]
        enum FloorFinishes {
            #[doc = "Cement screed."]
            CementScreed => "CEMENT_SCREED",

            #[doc = "Ceramic floor tiles."]
            CeramicFloorTiles => "CERAMIC_FLOOR_TILES",

            #[doc = "Porcelain tiles."]
            PorcelainTiles => "PORCELAIN_TILES",

            #[doc = "Timber flooring."]
            TimberFlooring => "TIMBER_FLOORING",

            #[doc = "Power floated concrete."]
            PowerFloated => "POWER_FLOATED",
        }
    }

    define_kind! {
        #[doc = "Options of the `WallFinishes` element."]
        enum WallFinishes {
            #[doc = "Plaster."]
            Plaster => "PLASTER",

            #[doc = "Ceramic wall tiles."]
            CeramicWallTiles => "CERAMIC_WALL_TILES",

            #[doc = "Cladding."]
            Cladding => "CLADDING",
        }
    }

    define_kind! {
        #[doc = "Options of the `Plumbing` element."]
        enum Plumbing {
            #[doc = "Basic fittings."]
            BasicPlumbing => "BASIC_PLUMBING",

            #[doc = "Standard fittings."]
            StandardPlumbing => "STANDARD_PLUMBING",

            #[doc = "Luxury fittings."]
            LuxuryPlumbing => "LUXURY_PLUMBING",
        }
    }

    define_kind! {
        #[doc = "Options of the `Electrical` element."]
        enum Electrical {
            #[doc = "Basic installation."]
            BasicElectrical => "BASIC_ELECTRICAL",

            #[doc = "Standard installation."]
            StandardElectrical => "STANDARD_ELECTRICAL",

            #[doc = "Luxury installation."]
            LuxuryElectrical => "LUXURY_ELECTRICAL",
        }
    }

    define_kind! {
        #[doc = "Options of the `Painting` element."]
        enum Painting {
            #[doc = "PVA paint."]
            PvaPaint => "PVA_PAINT",

            #[doc = "Acrylic paint."]
            AcrylicPaint => "ACRYLIC_PAINT",

            #[doc = "Textured coating."]
            TexturedCoating => "TEXTURED_COATING",
        }
    }

    define_kind! {
        #[doc = "Options of the `Veranda` element."]
        enum Veranda {
            #[doc = "Concrete slab veranda."]
            ConcreteVeranda => "CONCRETE_VERANDA",

            #[doc = "Tiled veranda."]
            TiledVeranda => "TILED_VERANDA",

            #[doc = "Timber deck."]
            TimberDeck => "TIMBER_DECK",
        }
    }

    define_kind! {
        #[doc = "Options of the `BoundaryWall` element."]
        enum BoundaryWall {
            #[doc = "Pre-cast concrete slabs."]
            PreCastSlabs => "PRE_CAST_SLABS",

            #[doc = "Brick wall."]
            BrickWall => "BRICK_WALL",

            #[doc = "Concrete block wall."]
            BlockWall => "BLOCK_WALL",

            #[doc = "Steel palisade."]
            Palisade => "PALISADE",
        }
    }

    define_kind! {
        #[doc = "Options of the `ElectricFence` element."]
        enum ElectricFence {
            #[doc = "No electric fence."]
            NoElectricFence => "NO_ELECTRIC_FENCE",

            #[doc = "Four strand fence."]
            FourStrand => "FOUR_STRAND_FENCE",

            #[doc = "Six strand fence."]
            SixStrand => "SIX_STRAND_FENCE",
        }
    }

    define_kind! {
        #[doc = "Options of the `Gate` element."]
        enum Gate {
            #[doc = "Sliding vehicle gate."]
            SlidingGate => "SLIDING_GATE",

            #[doc = "Swing vehicle gate."]
            SwingGate => "SWING_GATE",

            #[doc = "Pedestrian gate."]
            PedestrianGate => "PEDESTRIAN_GATE",
        }
    }

    define_kind! {
        #[doc = "Options of the `SwimmingPool` element."]
        enum SwimmingPool {
            #[doc = "No swimming pool."]
            NoPool => "NO_POOL",

            #[doc = "Gunite pool."]
            GunitePool => "GUNITE_POOL",

            #[doc = "Fibreglass pool."]
            FibreglassPool => "FIBREGLASS_POOL",
        }
    }

    define_kind! {
        #[doc = "Options of the `Paving` element."]
        enum Paving {
            #[doc = "Concrete pavers."]
            ConcretePavers => "CONCRETE_PAVERS",

            #[doc = "Clay pavers."]
            ClayPavers => "CLAY_PAVERS",

            #[doc = "Tarmac."]
            Tarmac => "TARMAC",

            #[doc = "Gravel."]
            Gravel => "GRAVEL",
        }
    }

    define_kind! {
        #[doc = "Options of the `CarPort` element."]
        enum CarPort {
            #[doc = "Shade net car port."]
            ShadeNetCarPort => "SHADE_NET_CARPORT",

            #[doc = "Steel roofed car port."]
            SteelCarPort => "STEEL_CARPORT",
        }
    }
}

/// Defines [`PropertyOption`] as a union of the per-[`Element`] option sets.
macro_rules! define_property_option {
    ($($element:ident),* $(,)?) => {
        /// Chosen material or approach of an [`Element`].
        ///
        /// Each variant is scoped to exactly one [`Element`].
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum PropertyOption {
            $(
                #[doc = concat!(
                    "Option of the [`Element::", stringify!($element), "`].",
                )]
                $element(option::$element),
            )*
        }

        impl PropertyOption {
            /// Returns the [`Element`] this [`PropertyOption`] belongs to.
            #[must_use]
            pub fn element(self) -> Element {
                match self {
                    $( Self::$element(_) => Element::$element, )*
                }
            }

            /// Returns the identifier keying reference rates of this
            /// [`PropertyOption`].
            #[must_use]
            pub fn identifier(self) -> &'static str {
                match self {
                    $( Self::$element(o) => o.as_str(), )*
                }
            }

            /// Returns all the [`PropertyOption`]s of the provided
            /// [`Element`].
            #[must_use]
            pub fn all_of(element: Element) -> Vec<Self> {
                match element {
                    $(
                        Element::$element => option::$element::ALL
                            .iter()
                            .copied()
                            .map(Self::$element)
                            .collect(),
                    )*
                }
            }

            /// Parses a [`PropertyOption`] of the provided [`Element`] from
            /// its identifier.
            ///
            /// # Errors
            ///
            /// If the identifier doesn't name an option of the [`Element`].
            pub fn parse(
                element: Element,
                identifier: &str,
            ) -> Result<Self, ConfigurationError> {
                let id = identifier.trim();
                match element {
                    $(
                        Element::$element => id
                            .parse::<option::$element>()
                            .ok()
                            .map(Self::$element),
                    )*
                }
                .ok_or_else(|| ConfigurationError::UnknownPropertyOption {
                    element,
                    identifier: identifier.to_owned(),
                })
            }
        }
    };
}

define_property_option! {
    Foundations,
    Concrete,
    Brickwork,
    RoofStructure,
    RoofingCover,
    Ceilings,
    Windows,
    Doors,
    FloorFinishes,
    WallFinishes,
    Plumbing,
    Electrical,
    Painting,
    Veranda,
    BoundaryWall,
    ElectricFence,
    Gate,
    SwimmingPool,
    Paving,
    CarPort,
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use super::{option, ConfigurationError, Element, PropertyOption};

    #[test]
    fn identifiers_are_unique_across_elements() {
        let mut seen = HashSet::new();
        for &element in Element::ALL {
            for o in PropertyOption::all_of(element) {
                assert!(
                    seen.insert(o.identifier()),
                    "duplicated identifier: {}",
                    o.identifier(),
                );
                assert_eq!(o.element(), element);
            }
        }
    }

    #[test]
    fn every_element_has_options() {
        for &element in Element::ALL {
            assert!(
                !PropertyOption::all_of(element).is_empty(),
                "no options for `{element}`",
            );
        }
    }

    #[test]
    fn parses_option_scoped_to_element() {
        assert_eq!(
            PropertyOption::parse(Element::BoundaryWall, "PRE_CAST_SLABS"),
            Ok(PropertyOption::BoundaryWall(
                option::BoundaryWall::PreCastSlabs,
            )),
        );
        assert_eq!(
            PropertyOption::parse(Element::Brickwork, " STOCK_BRICKS "),
            Ok(PropertyOption::Brickwork(option::Brickwork::StockBricks)),
        );

        assert_eq!(
            PropertyOption::parse(Element::Brickwork, "PRE_CAST_SLABS"),
            Err(ConfigurationError::UnknownPropertyOption {
                element: Element::Brickwork,
                identifier: "PRE_CAST_SLABS".to_owned(),
            }),
        );
    }

    #[test]
    fn parses_element() {
        assert_eq!(Element::parse("Boundary_Wall"), Ok(Element::BoundaryWall));
        assert_eq!(Element::parse("Plumbing"), Ok(Element::Plumbing));
        assert_eq!(
            Element::parse("Chimney"),
            Err(ConfigurationError::UnknownElement("Chimney".to_owned())),
        );
    }

    #[test]
    fn baseline_is_not_separately_charged_except_veranda() {
        let separate = Element::BASELINE
            .iter()
            .filter(|e| e.is_separately_charged())
            .collect::<Vec<_>>();
        assert_eq!(separate, [&Element::Veranda]);
        assert!(Element::CarPort.is_separately_charged());
    }
}
