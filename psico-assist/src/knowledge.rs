//! Built-in knowledge base of the support assistant (Spanish).

pub(crate) struct IntentDef {
    pub category: &'static str,
    pub patterns: &'static [&'static str],
    pub responses: &'static [&'static str],
}

pub(crate) const INTENTS: &[IntentDef] = &[
    IntentDef {
        category: "greeting",
        patterns: &["hola", "buenos días", "buenas tardes", "buenas noches", "hey", "saludos", "ola"],
        responses: &[
            "¡Hola! Soy Luna, tu compañera virtual. Estoy aquí para escucharte. ¿Cómo te sientes hoy?",
            "¡Hola! Me alegra que estés aquí. Soy Luna 💙 ¿Quieres hablar de algo? Estoy para ti.",
            "¡Hey! 👋 Soy Luna, y estoy aquí para hacerte compañía. ¿Cómo ha estado tu día?",
        ],
    },
    IntentDef {
        category: "emotional_support",
        patterns: &[
            "triste", "mal", "deprimido", "solo", "sola", "ansiedad", "ansioso", "preocupado", "miedo",
            "angustia", "llorar", "dolor",
        ],
        responses: &[
            "Lamento mucho que te sientas así 💙 Está bien sentirse vulnerable a veces. ¿Quieres contarme más sobre lo que estás pasando? Aquí estoy para escucharte sin juzgar.",
            "Entiendo que estés pasando por un momento difícil. No estás solo en esto 🤗 A veces, solo hablar de lo que sentimos ya ayuda. ¿Qué ha estado pesando en tu mente?",
            "Tu dolor es válido, y está bien no estar bien 💜 Gracias por confiar en mí. ¿Hay algo específico que te gustaría desahogar? Tómate tu tiempo.",
            "Siento que estás cargando con algo pesado 🌙 Recuerda que pedir ayuda es un acto de valentía. ¿Quieres que hablemos de cómo te sientes, o prefieres que te ayude a agendar una cita con un profesional?",
        ],
    },
    IntentDef {
        category: "positive_emotions",
        patterns: &["bien", "feliz", "contento", "contenta", "genial", "excelente", "alegre", "mejor", "emocionado"],
        responses: &[
            "¡Qué alegría leer eso! 😊✨ Me encanta saber que estás bien. ¿Qué ha hecho que tu día sea bueno?",
            "¡Eso es maravilloso! 🌟 Tu energía positiva es contagiosa. Cuéntame, ¿hay algo especial que quieras compartir?",
            "¡Me alegro muchísimo por ti! 💛 Es hermoso celebrar los buenos momentos. ¿Qué te ha traído esa felicidad?",
        ],
    },
    IntentDef {
        category: "loneliness",
        patterns: &["solo", "sola", "nadie", "acompañar", "compañía", "hablar", "escuchar", "charlar"],
        responses: &[
            "Estoy aquí contigo 💙 La soledad puede ser muy dura, pero quiero que sepas que no estás solo. Hablemos de lo que quieras, sin presión. ¿Qué has estado haciendo hoy?",
            "No estás solo, yo estoy aquí para hacerte compañía 🌙 A veces solo necesitamos saber que alguien nos escucha. ¿Qué te gustaría platicar?",
            "Entiendo esa sensación de soledad 💜 Pero ahora mismo, estoy aquí para ti. Podemos hablar de lo que necesites: tus pensamientos, tu día, tus preocupaciones... lo que sea.",
            "La soledad duele, lo sé 🤗 Pero recuerda que siempre puedes venir aquí a conversar conmigo. ¿Hay algo que te esté rondando la mente?",
        ],
    },
    IntentDef {
        category: "stress",
        patterns: &["estres", "estresado", "cansado", "agobiado", "exhausto", "no puedo", "demasiado"],
        responses: &[
            "Suena como si estuvieras llevando mucho peso 😔 Está bien sentirse abrumado, pero también está bien hacer una pausa. ¿Quieres contarme qué te tiene tan estresado?",
            "El estrés puede ser agotador 💙 Tomar un momento para respirar y hablar puede ayudar. Estoy aquí para escucharte. ¿Qué es lo que más te agobia ahora mismo?",
            "Siento que estás cansado 🌙 Recuerda que no tienes que cargar con todo solo. ¿Hay algo específico que te esté pesando?",
        ],
    },
    IntentDef {
        category: "support",
        patterns: &["ayuda", "no se", "no sé", "perdido", "confundido", "que hago"],
        responses: &[
            "Está bien sentirse perdido a veces 💜 Lo importante es que estás buscando apoyo, y eso es muy valiente. Cuéntame, ¿qué es lo que te tiene confundido?",
            "No estás solo en esto 🤗 A veces, solo necesitamos hablar para ver las cosas más claras. ¿Qué situación te está complicando ahora?",
            "Sentirse así es parte de ser humano 💙 Estoy aquí para acompañarte mientras encuentras tu camino. ¿Quieres contarme más?",
        ],
    },
    IntentDef {
        category: "gratitude",
        patterns: &["gracias", "agradezco", "graciass", "thank"],
        responses: &[
            "No hay de qué 💙 Para eso estoy aquí, para acompañarte. Si necesitas hablar más, aquí estaré.",
            "Me alegra haberte ayudado aunque sea un poco 😊 Recuerda que siempre puedes volver cuando lo necesites.",
            "Gracias a ti por confiar en mí 🌙 Cuidar de tu bienestar emocional es importante. Vuelve cuando quieras.",
        ],
    },
    IntentDef {
        category: "appointment",
        patterns: &["agendar", "cita", "reservar", "turno", "hora", "disponibilidad", "cupo", "terapia", "sesion"],
        responses: &[
            "Me alegra que quieras dar ese paso 💙 Agendar una cita es importante. Te guío: 1) Ve a \"Profesionales\" 2) Elige el psicólogo que mejor se ajuste a ti 3) Selecciona fecha y hora 4) ¡Listo! ¿Necesitas ayuda con algún paso?",
            "Es valiente buscar apoyo profesional 🌟 Para tu cita: encuentra tu psicólogo en \"Profesionales\", revisa su perfil, y agenda en el horario que te convenga. ¿Te ayudo con algo más?",
            "Qué bueno que quieras cuidar de ti 💜 El proceso es simple: \"Profesionales\" → Selecciona uno → Elige tu horario. Si tienes dudas, aquí estoy.",
        ],
    },
    IntentDef {
        category: "casual",
        patterns: &["como estas", "cómo estás", "que tal", "qué tal", "como va", "todo bien"],
        responses: &[
            "¡Gracias por preguntar! 😊 Yo estoy aquí, lista para acompañarte. Pero lo importante es: ¿cómo estás tú?",
            "Estoy bien, gracias por preguntar 💙 Pero cuéntame de ti, ¿cómo te sientes hoy?",
            "Muy bien, gracias 🌙 ¿Y tú? ¿Cómo ha sido tu día?",
        ],
    },
    IntentDef {
        category: "crisis",
        patterns: &["suicidar", "morir", "matarme", "acabar", "terminar todo", "no quiero vivir"],
        responses: &[
            "⚠️ Por favor, si estás en crisis, contacta inmediatamente: Línea de Prevención del Suicidio 1-888-628-9454. Tu vida importa, y hay personas capacitadas esperando ayudarte ahora mismo. 💙",
            "⚠️ Lo que sientes es muy serio. Por favor llama YA a emergencias o a la Línea de Prevención del Suicidio: 1-888-628-9454. No estás solo, hay ayuda disponible las 24 horas. 🆘",
        ],
    },
    IntentDef {
        category: "about_bot",
        patterns: &["quien eres", "quién eres", "que eres", "qué eres", "tu nombre", "como te llamas"],
        responses: &[
            "Soy Luna 🌙 Tu compañera virtual en PsicoAdmin. No soy un profesional, pero estoy aquí para escucharte, acompañarte y ayudarte a encontrar el apoyo que necesitas. ¿De qué quieres hablar?",
            "Me llamo Luna 💙 Soy una asistente virtual diseñada para hacerte compañía y apoyarte emocionalmente. Aunque no reemplazo a un psicólogo, puedo escucharte y orientarte. ¿Cómo puedo ayudarte hoy?",
        ],
    },
    IntentDef {
        category: "payment",
        patterns: &["pagar", "pago", "precio", "costo", "tarjeta", "stripe", "cobro"],
        responses: &[
            "Los pagos se procesan de forma segura a través de Stripe. Después de agendar tu cita, serás redirigido al checkout donde podrás pagar con tarjeta. ¿Tienes alguna duda sobre el proceso?",
            "Aceptamos pagos con tarjeta de crédito/débito a través de Stripe. El precio depende del profesional que elijas. ¿Necesitas más información?",
        ],
    },
    IntentDef {
        category: "documents",
        patterns: &["documento", "descargar", "archivo", "pdf", "informe", "material"],
        responses: &[
            "Puedes ver y descargar todos tus documentos clínicos en la sección \"Mis Documentos\". Tus psicólogos subirán allí material de apoyo e informes. ¿Necesitas ayuda para encontrar algo?",
            "En \"Mis Documentos\" encontrarás todo el material que tus profesionales te han compartido. Puedes descargarlo haciendo clic en el botón \"Descargar\". ¿Hay algo específico que busques?",
        ],
    },
    IntentDef {
        category: "professionals",
        patterns: &["psicólogo", "profesional", "terapeuta", "especialista", "doctor"],
        responses: &[
            "Contamos con profesionales especializados en diferentes áreas. Puedes ver sus perfiles, especialidades y disponibilidad en la sección \"Profesionales\". ¿Buscas alguna especialidad en particular?",
            "Todos nuestros psicólogos están certificados y cuentan con amplia experiencia. En la sección \"Profesionales\" puedes ver su información, reseñas y horarios disponibles.",
        ],
    },
    IntentDef {
        category: "history",
        patterns: &["historial", "historia clínica", "expediente", "antecedentes", "registro"],
        responses: &[
            "Tu historial clínico es confidencial y solo accesible para ti y tus profesionales asignados. Contiene notas de sesión, diagnósticos y evolución de tu tratamiento.",
            "El historial clínico se actualiza después de cada sesión. Tu psicólogo registra notas importantes que ayudan a dar seguimiento a tu proceso terapéutico.",
        ],
    },
    IntentDef {
        category: "profile",
        patterns: &["perfil", "cuenta", "contraseña", "email", "datos", "información personal"],
        responses: &[
            "Puedes actualizar tu información personal en la sección \"Mi Perfil\". Allí también puedes cambiar tu contraseña y foto de perfil.",
            "Para modificar tus datos: Ve a \"Mi Perfil\" → Edita la información que necesites → Guarda los cambios. ¿Necesitas ayuda específica con algo?",
        ],
    },
    IntentDef {
        category: "help",
        patterns: &["ayuda", "help", "no entiendo", "no funciona", "error", "problema"],
        responses: &[
            "Estoy aquí para ayudarte. ¿Podrías contarme más detalles sobre lo que necesitas? Por ejemplo: ¿quieres agendar una cita, ver documentos, o tienes un problema técnico?",
            "Claro, con gusto te ayudo. ¿Es sobre: agendamiento de citas, pagos, documentos, o algo más? Cuéntame para orientarte mejor.",
        ],
    },
    IntentDef {
        category: "farewell",
        patterns: &["adiós", "adios", "chao", "bye", "hasta luego", "nos vemos", "me voy"],
        responses: &[
            "Cuídate mucho 💙 Recuerda que siempre estaré aquí cuando necesites hablar. No estás solo. ¡Hasta pronto! 🌙",
            "Fue un gusto acompañarte 😊 Vuelve cuando quieras, día o noche. Aquí estaré para ti. ¡Que estés bien! ✨",
            "Hasta luego 💜 Recuerda: está bien no estar bien, y está bien pedir ayuda. Vuelve pronto. Te mando un abrazo virtual 🤗",
        ],
    },
];

pub(crate) const DEFAULT_RESPONSES: &[&str] = &[
    "Mmm, cuéntame más sobre eso 💙 A veces hablar ayuda a ordenar los pensamientos. ¿Qué te gustaría compartir?",
    "Te escucho 🌙 No estoy segura de haber entendido completamente, pero estoy aquí para ti. ¿Puedes contarme un poco más?",
    "Estoy aquí para acompañarte 💜 ¿Quieres hablar sobre cómo te sientes, o prefieres que te ayude con algo específico de la plataforma?",
    "Estoy contigo 🤗 Si quieres desahogarte, adelante. Si necesitas ayuda técnica con citas o documentos, también puedo orientarte.",
    "Sigo aquí, escuchándote 💙 ¿Hay algo que te esté pesando? A veces solo necesitamos expresar lo que sentimos.",
];

pub(crate) const WELCOME: &str = "¡Hola! Soy Luna, tu compañera virtual. Estoy aquí para escucharte, acompañarte y apoyarte en lo que necesites. No estás solo. ¿Cómo te sientes hoy?";

pub(crate) const QUICK_ACTIONS: &[&str] = &[
    "Me siento solo",
    "¿Cómo agendar una cita?",
    "Necesito hablar",
    "Estoy estresado",
];
